//! In-process cluster of nodes, each owning its own sharded store.
//!
//! There is no transport, membership or failure model here: a node is a
//! named local object. Ids are routed to one node with the same hash the
//! stores use for partitions, but with a different seed per layer so the
//! two levels of routing stay independent.

use tracing::debug;

use crate::error::{Error, Result};
use crate::filter::MetadataFilter;
use crate::partition::SearchHit;
use crate::router::PartitionRouter;
use crate::search;
use crate::store::{Store, StoreConfig};
use crate::vector::VectorRecord;

/// A named node holding one store.
#[derive(Debug)]
pub struct Node {
    id: String,
    store: Store,
}

impl Node {
    pub fn new<I: Into<String>>(id: I, config: StoreConfig) -> Result<Self> {
        Ok(Self {
            id: id.into(),
            store: Store::new(config)?,
        })
    }

    #[inline]
    pub fn id(&self) -> &str {
        &self.id
    }

    #[inline]
    pub fn store(&self) -> &Store {
        &self.store
    }
}

/// A fixed set of nodes that together behave like one store.
///
/// # Example
///
/// ```
/// use savitar_core::{Cluster, MetadataFilter, VectorRecord};
///
/// let cluster = Cluster::new(3, 2).unwrap();
/// cluster.add_vector(VectorRecord::new("vec1", vec![1.0, 2.0, 3.0])).unwrap();
/// cluster.add_vector(VectorRecord::new("vec2", vec![4.0, 5.0, 6.0])).unwrap();
///
/// assert_eq!(cluster.get_vector("vec1").unwrap().data, vec![1.0, 2.0, 3.0]);
///
/// let hits = cluster.search_vectors(&[1.0, 2.0, 3.0], 1, &MetadataFilter::new()).unwrap();
/// assert_eq!(hits[0].id(), "vec1");
/// ```
#[derive(Debug)]
pub struct Cluster {
    router: PartitionRouter,
    nodes: Vec<Node>,
}

impl Cluster {
    /// Creates `node_count` nodes named `node-0`, `node-1`, ... each with
    /// `partitions_per_node` partitions.
    pub fn new(node_count: usize, partitions_per_node: usize) -> Result<Self> {
        Self::with_config(node_count, StoreConfig::new(partitions_per_node))
    }

    /// Creates a cluster whose node stores are built from `base`.
    ///
    /// Node `i` routes with seed `base.routing_seed + i + 1`; the cluster
    /// itself routes with `base.routing_seed`.
    pub fn with_config(node_count: usize, base: StoreConfig) -> Result<Self> {
        let router = PartitionRouter::with_seed(node_count, base.routing_seed)?;
        let nodes = (0..node_count)
            .map(|i| {
                let seed = base.routing_seed.wrapping_add(i as u64 + 1);
                Node::new(format!("node-{i}"), base.clone().with_routing_seed(seed))
            })
            .collect::<Result<Vec<_>>>()?;

        debug!(nodes = node_count, "created cluster");
        Ok(Self { router, nodes })
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    /// Returns the node that owns `id`.
    pub fn node_for(&self, id: &str) -> Result<&Node> {
        self.nodes
            .get(self.router.route(id))
            .ok_or(Error::NoPartitionAvailable)
    }

    pub fn add_vector(&self, record: VectorRecord) -> Result<()> {
        self.node_for(&record.id)?.store.add_vector(record)
    }

    pub fn update_vector(&self, record: VectorRecord) -> Result<()> {
        self.node_for(&record.id)?.store.update_vector(record)
    }

    pub fn get_vector(&self, id: &str) -> Result<VectorRecord> {
        self.node_for(id)?.store.get_vector(id)
    }

    pub fn delete_vector(&self, id: &str) -> Result<VectorRecord> {
        self.node_for(id)?.store.delete_vector(id)
    }

    /// Returns the total number of records across nodes.
    pub fn len(&self) -> usize {
        self.nodes.iter().map(|n| n.store.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.iter().all(|n| n.store.is_empty())
    }

    /// Searches every node concurrently; each node fans out over its own
    /// partitions. Same ranking and all-or-nothing failure as
    /// [`Store::search_vectors`].
    pub fn search_vectors(
        &self,
        query: &[f64],
        top_n: usize,
        filter: &MetadataFilter,
    ) -> Result<Vec<SearchHit>> {
        search::validate_request(query, top_n)?;
        debug!(nodes = self.nodes.len(), top_n, "cluster fan-out");
        let outcomes = search::fan_out(&self.nodes, |node| {
            node.store.search_vectors(query, top_n, filter)
        });
        search::merge(outcomes, top_n)
    }
}
