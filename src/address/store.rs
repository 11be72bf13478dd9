use super::NewAddress;
use crate::models::Address;
use async_trait::async_trait;
use parking_lot::RwLock;
use std::sync::Arc;
use uuid::Uuid;

/// Storage seam for address records. Handlers only ever see this trait.
#[async_trait]
pub trait AddressRepository: Send + Sync {
    /// All records in insertion order.
    async fn list(&self) -> anyhow::Result<Vec<Address>>;

    /// Assigns a fresh id, appends the record and returns it.
    async fn insert(&self, address: NewAddress) -> anyhow::Result<Address>;

    /// Removes the first record with this id, if any.
    async fn remove(&self, id: &str) -> anyhow::Result<Option<Address>>;
}

/// Process-lifetime collection. Lost on restart.
#[derive(Clone, Default)]
pub struct InMemoryAddressStore {
    inner: Arc<RwLock<Vec<Address>>>,
}

impl InMemoryAddressStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl AddressRepository for InMemoryAddressStore {
    async fn list(&self) -> anyhow::Result<Vec<Address>> {
        Ok(self.inner.read().clone())
    }

    async fn insert(&self, address: NewAddress) -> anyhow::Result<Address> {
        let mut records = self.inner.write();

        // ids must stay unique across the collection
        let id = loop {
            let candidate = Uuid::new_v4().to_string();
            if !records.iter().any(|r| r.id == candidate) {
                break candidate;
            }
        };

        let address = address.into_address(id);
        records.push(address.clone());
        Ok(address)
    }

    async fn remove(&self, id: &str) -> anyhow::Result<Option<Address>> {
        let mut records = self.inner.write();
        Ok(records
            .iter()
            .position(|r| r.id == id)
            .map(|index| records.remove(index)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn new_address(first_name: &str) -> NewAddress {
        NewAddress {
            first_name: first_name.to_string(),
            last_name: "B".to_string(),
            address1: "1 Main".to_string(),
            address2: None,
            city: "X".to_string(),
            state: "NY".to_string(),
            zip: "10001".to_string(),
        }
    }

    #[tokio::test]
    async fn starts_empty() {
        let store = InMemoryAddressStore::new();
        assert!(store.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn insert_assigns_unique_ids_and_keeps_order() {
        let store = InMemoryAddressStore::new();
        let mut ids = HashSet::new();

        for name in ["first", "second", "third"] {
            let created = store.insert(new_address(name)).await.unwrap();
            assert!(Uuid::parse_str(&created.id).is_ok());
            assert!(ids.insert(created.id));
        }

        let names: Vec<_> = store
            .list()
            .await
            .unwrap()
            .into_iter()
            .map(|a| a.first_name)
            .collect();
        assert_eq!(names, ["first", "second", "third"]);
    }

    #[tokio::test]
    async fn remove_takes_exactly_one_record() {
        let store = InMemoryAddressStore::new();
        let keep = store.insert(new_address("keep")).await.unwrap();
        let gone = store.insert(new_address("drop")).await.unwrap();

        let removed = store.remove(&gone.id).await.unwrap();
        assert_eq!(removed, Some(gone.clone()));
        assert_eq!(store.list().await.unwrap(), vec![keep]);

        assert_eq!(store.remove(&gone.id).await.unwrap(), None);
        assert_eq!(store.list().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn clones_share_the_collection() {
        let store = InMemoryAddressStore::new();
        let handle = store.clone();

        handle.insert(new_address("shared")).await.unwrap();
        assert_eq!(store.list().await.unwrap().len(), 1);
    }
}
