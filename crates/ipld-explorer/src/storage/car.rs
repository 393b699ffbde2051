//! CAR file-backed block source

use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;

use bytes::Bytes;

use crate::car::{self, ParsedCar};
use crate::error::Result;
use crate::identifier::{Identifier, IpldCid};
use crate::storage::BlockSource;

/// Read-only block source over a CAR file
///
/// Loads the entire CAR file into memory on construction. For very large
/// archives, consider a database-backed source instead.
#[derive(Debug, Clone)]
pub struct CarBlockStore {
    blocks: Arc<BTreeMap<IpldCid, Bytes>>,
    roots: Arc<Vec<IpldCid>>,
}

impl CarBlockStore {
    /// Load from an existing CAR file
    pub async fn load(path: impl AsRef<Path>) -> Result<Self> {
        Ok(car::read_car(path).await?.into())
    }

    /// Load from in-memory CAR bytes
    pub async fn from_bytes(data: &[u8]) -> Result<Self> {
        Ok(car::parse_car_bytes(data).await?.into())
    }

    /// The CAR header roots
    pub fn roots(&self) -> Vec<Identifier> {
        self.roots.iter().map(|cid| (*cid).into()).collect()
    }

    /// Number of blocks in the archive
    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    /// Check if the archive has no blocks
    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }
}

impl From<ParsedCar> for CarBlockStore {
    fn from(parsed: ParsedCar) -> Self {
        Self {
            blocks: Arc::new(parsed.blocks),
            roots: Arc::new(parsed.roots),
        }
    }
}

impl BlockSource for CarBlockStore {
    async fn get(&self, id: &Identifier) -> Result<Option<Bytes>> {
        Ok(self.blocks.get(id.cid()).cloned())
    }

    async fn has(&self, id: &Identifier) -> Result<bool> {
        Ok(self.blocks.contains_key(id.cid()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::identifier::compute_cid;
    use crate::multicodec::RAW;
    use iroh_car::{CarHeader, CarWriter};
    use tempfile::NamedTempFile;

    async fn car_bytes(root: IpldCid, data: &[u8]) -> Vec<u8> {
        let mut buf = Vec::new();
        let mut writer = CarWriter::new(CarHeader::new_v1(vec![root]), &mut buf);
        writer.write(root, data).await.unwrap();
        writer.finish().await.unwrap();
        buf
    }

    #[tokio::test]
    async fn test_load_and_get() {
        let data = Bytes::from_static(b"car block");
        let cid = compute_cid(RAW, &data).unwrap();
        let missing: Identifier = compute_cid(RAW, b"not in the car").unwrap().into();

        let temp_file = NamedTempFile::new().unwrap();
        tokio::fs::write(temp_file.path(), car_bytes(cid, &data).await)
            .await
            .unwrap();

        let store = CarBlockStore::load(temp_file.path()).await.unwrap();
        assert_eq!(store.len(), 1);
        assert_eq!(store.roots(), vec![Identifier::from(cid)]);

        let root = store.roots()[0];
        assert_eq!(store.get(&root).await.unwrap(), Some(data));
        assert!(store.has(&root).await.unwrap());
        assert_eq!(store.get(&missing).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_missing_file_is_io_error() {
        let err = CarBlockStore::load("/nonexistent/path/to.car")
            .await
            .unwrap_err();
        assert_eq!(*err.kind(), crate::ResolveErrorKind::Io);
    }
}
