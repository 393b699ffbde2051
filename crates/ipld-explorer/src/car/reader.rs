//! CAR file reading utilities

use crate::error::{ResolveError, Result};
use crate::identifier::IpldCid;
use bytes::Bytes;
use iroh_car::CarReader;
use n0_future::stream::StreamExt;
use std::collections::BTreeMap;
use std::path::Path;
use tokio::fs::File;
use tokio::io::AsyncRead;

/// Parsed CAR file data
#[derive(Debug, Clone)]
pub struct ParsedCar {
    /// Root CIDs from the CAR header, in header order
    pub roots: Vec<IpldCid>,
    /// All blocks in the CAR file
    pub blocks: BTreeMap<IpldCid, Bytes>,
}

/// Read entire CAR file into memory
///
/// Returns the header roots and a BTreeMap of CID -> block data (sorted order
/// for determinism).
pub async fn read_car(path: impl AsRef<Path>) -> Result<ParsedCar> {
    let file = File::open(path).await.map_err(ResolveError::io)?;
    collect(file).await
}

/// Parse CAR bytes into roots and block map
///
/// For in-memory CAR data (e.g. a CAR fetched over HTTP).
pub async fn parse_car_bytes(data: &[u8]) -> Result<ParsedCar> {
    collect(data).await
}

async fn collect<R: AsyncRead + Send + Unpin>(source: R) -> Result<ParsedCar> {
    let reader = CarReader::new(source)
        .await
        .map_err(ResolveError::car_parse)?;

    let roots = reader.header().roots().to_vec();

    let mut blocks = BTreeMap::new();
    let stream = reader.stream();
    n0_future::pin!(stream);

    while let Some(result) = stream.next().await {
        let (cid, data) = result.map_err(ResolveError::car_parse)?;
        blocks.insert(cid, Bytes::from(data));
    }

    #[cfg(feature = "tracing")]
    tracing::debug!(roots = roots.len(), blocks = blocks.len(), "read CAR");

    Ok(ParsedCar { roots, blocks })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::identifier::compute_cid;
    use crate::multicodec::RAW;
    use iroh_car::CarWriter;
    use tempfile::NamedTempFile;
    use tokio::io::AsyncWriteExt;

    async fn make_test_car(roots: Vec<IpldCid>, blocks: Vec<(IpldCid, Vec<u8>)>) -> Vec<u8> {
        let mut buf = Vec::new();
        let header = iroh_car::CarHeader::new_v1(roots);
        let mut writer = CarWriter::new(header, &mut buf);

        for (cid, data) in blocks {
            writer.write(cid, data).await.unwrap();
        }

        writer.finish().await.unwrap();
        buf.flush().await.unwrap();
        buf
    }

    fn block(value: u8) -> (IpldCid, Vec<u8>) {
        let data = vec![value; 3];
        (compute_cid(RAW, &data).unwrap(), data)
    }

    #[tokio::test]
    async fn test_parse_car_with_blocks() {
        let (cid1, data1) = block(1);
        let (cid2, data2) = block(2);

        let car_bytes = make_test_car(
            vec![cid1],
            vec![(cid1, data1.clone()), (cid2, data2.clone())],
        )
        .await;

        let parsed = parse_car_bytes(&car_bytes).await.unwrap();
        assert_eq!(parsed.roots, vec![cid1]);
        assert_eq!(parsed.blocks.len(), 2);
        assert_eq!(parsed.blocks.get(&cid1).unwrap().as_ref(), &data1);
        assert_eq!(parsed.blocks.get(&cid2).unwrap().as_ref(), &data2);
    }

    #[tokio::test]
    async fn test_read_car_from_file() {
        let (cid1, data1) = block(1);
        let (cid2, _) = block(2);

        let car_bytes = make_test_car(vec![cid1, cid2], vec![(cid1, data1.clone())]).await;

        let temp_file = NamedTempFile::new().unwrap();
        tokio::io::AsyncWriteExt::write_all(
            &mut tokio::fs::File::from_std(temp_file.reopen().unwrap()),
            &car_bytes,
        )
        .await
        .unwrap();

        let parsed = read_car(temp_file.path()).await.unwrap();
        assert_eq!(parsed.roots, vec![cid1, cid2]);
        assert_eq!(parsed.blocks.len(), 1);
        assert_eq!(parsed.blocks.get(&cid1).unwrap().as_ref(), &data1);
    }

    #[tokio::test]
    async fn test_garbage_is_a_car_error() {
        let err = parse_car_bytes(b"definitely not a car").await.unwrap_err();
        assert_eq!(*err.kind(), crate::ResolveErrorKind::Car);
    }
}
