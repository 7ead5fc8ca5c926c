//! Phase two: resolving recorded regions against a mounted tree.
//!
//! Phase one hands back HTML plus a [`Resolver`]. Once the host has
//! attached that HTML to a real tree it calls [`Resolver::resolve`] with the
//! root, and gets back only the regions whose target element exists there.

use crate::dom::Node;
use crate::region::{LiveRegion, RegionDescriptor};

/// A tree the host has mounted compiled HTML into.
///
/// Hosts implement this over their own node type. [`Node`] implements it
/// for server-side resolution.
pub trait MountedRoot {
    /// Find a descendant element by id.
    fn find_by_id(&self, id: &str) -> Option<&dyn MountedRoot>;
}

impl MountedRoot for Node {
    fn find_by_id(&self, id: &str) -> Option<&dyn MountedRoot> {
        self.element_by_id(id).map(|node| node as &dyn MountedRoot)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
enum Pending {
    Region(RegionDescriptor),
    /// A lifted table. Its inner regions live under the table's own
    /// placeholder and are resolved against that subtree only.
    Table {
        region: RegionDescriptor,
        inner: Resolver,
    },
}

/// Ordered set of regions waiting for a mounted root.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Resolver {
    pending: Vec<Pending>,
}

impl Resolver {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn push(&mut self, region: RegionDescriptor) {
        self.pending.push(Pending::Region(region));
    }

    pub(crate) fn push_table(&mut self, region: RegionDescriptor, inner: Resolver) {
        self.pending.push(Pending::Table { region, inner });
    }

    /// Append another stage's regions after this one's.
    pub fn extend(&mut self, other: Resolver) {
        self.pending.extend(other.pending);
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Resolve every pending region against `root`.
    ///
    /// A region whose target is missing is skipped: the host may not have
    /// mounted it yet, or its data has not loaded.
    pub fn resolve(&self, root: &dyn MountedRoot) -> Vec<LiveRegion> {
        let mut live = Vec::new();
        self.resolve_into(root, &mut live);
        live
    }

    fn resolve_into(&self, root: &dyn MountedRoot, live: &mut Vec<LiveRegion>) {
        for pending in &self.pending {
            match pending {
                Pending::Region(region) => {
                    if root.find_by_id(&region.id).is_some() {
                        live.push(region.clone());
                    }
                }
                Pending::Table { region, inner } => {
                    if let Some(subtree) = root.find_by_id(&region.id) {
                        live.push(region.clone());
                        inner.resolve_into(subtree, live);
                    }
                }
            }
        }
    }

    /// Every recorded descriptor, flattened in resolve order.
    pub fn descriptors(&self) -> Vec<&RegionDescriptor> {
        let mut out = Vec::new();
        self.collect_descriptors(&mut out);
        out
    }

    fn collect_descriptors<'a>(&'a self, out: &mut Vec<&'a RegionDescriptor>) {
        for pending in &self.pending {
            match pending {
                Pending::Region(region) => out.push(region),
                Pending::Table { region, inner } => {
                    out.push(region);
                    inner.collect_descriptors(out);
                }
            }
        }
    }

    /// Lifted tables with the HTML their placeholders should receive.
    pub(crate) fn lifted_tables(&self) -> impl Iterator<Item = (&RegionDescriptor, &Resolver)> {
        self.pending.iter().filter_map(|pending| match pending {
            Pending::Table { region, inner } => Some((region, inner)),
            Pending::Region(_) => None,
        })
    }
}
