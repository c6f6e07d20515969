//! Benchmarks for the source-list controller.
//!
//! Run with: cargo bench -p sourcelist

use criterion::{BatchSize, BenchmarkId, Criterion, criterion_group, criterion_main};
use sourcelist::SourceList;
use sourcelist_core::{
    Capabilities, ChangeBatch, ChangedObject, DropTarget, EntityKind, ItemId, SourceModel,
};
use std::collections::HashMap;
use std::hint::black_box;

/// In-memory model with `groups` roots of `per_group` children each.
#[derive(Clone)]
struct BenchModel {
    roots: Vec<ItemId>,
    children: HashMap<ItemId, Vec<ItemId>>,
    parents: HashMap<ItemId, ItemId>,
    indexes: HashMap<ItemId, i64>,
}

impl BenchModel {
    fn new(groups: usize, per_group: usize) -> Self {
        let mut roots = Vec::with_capacity(groups);
        let mut children = HashMap::new();
        let mut parents = HashMap::new();
        let mut indexes = HashMap::new();
        for g in 0..groups {
            let group = ItemId::new(format!("g{g}"));
            let mut kids = Vec::with_capacity(per_group);
            for i in 0..per_group {
                let child = ItemId::new(format!("c{g}_{i}"));
                parents.insert(child.clone(), group.clone());
                indexes.insert(child.clone(), i as i64);
                kids.push(child);
            }
            children.insert(group.clone(), kids);
            roots.push(group);
        }
        Self {
            roots,
            children,
            parents,
            indexes,
        }
    }
}

impl SourceModel for BenchModel {
    fn roots(&self) -> Vec<ItemId> {
        self.roots.clone()
    }

    fn is_root(&self, id: &ItemId) -> bool {
        self.roots.contains(id)
    }

    fn children_of(&self, id: &ItemId) -> Vec<ItemId> {
        self.children.get(id).cloned().unwrap_or_default()
    }

    fn display_name(&self, id: &ItemId) -> String {
        id.as_str().to_owned()
    }

    fn set_display_name(&mut self, _id: &ItemId, _name: &str) {}

    fn is_selectable(&self, id: &ItemId) -> bool {
        !self.is_root(id)
    }

    fn ordering_index(&self, id: &ItemId) -> Option<i64> {
        self.indexes.get(id).copied()
    }

    fn set_ordering_index(&mut self, id: &ItemId, index: i64) {
        self.indexes.insert(id.clone(), index);
    }

    fn parent_of(&self, id: &ItemId) -> Option<ItemId> {
        self.parents.get(id).cloned()
    }

    fn supports_internal_drag(&self) -> bool {
        true
    }

    fn allows_reordering(&self) -> bool {
        true
    }

    fn capabilities(&self) -> Capabilities {
        Capabilities::ORDERING_INDEX
    }
}

fn bench_build(c: &mut Criterion) {
    let mut group = c.benchmark_group("sourcelist/build");

    for (groups, per_group) in [(4, 25), (10, 100), (50, 100)] {
        let model = BenchModel::new(groups, per_group);
        let total = groups * (per_group + 1);
        group.bench_with_input(BenchmarkId::from_parameter(total), &model, |b, model| {
            b.iter_batched(
                || model.clone(),
                |model| black_box(SourceList::new(model).unwrap()),
                BatchSize::SmallInput,
            )
        });
    }

    group.finish();
}

fn bench_rows(c: &mut Criterion) {
    let mut group = c.benchmark_group("sourcelist/rows");

    for (groups, per_group) in [(4, 25), (10, 100), (50, 100)] {
        let list = SourceList::new(BenchModel::new(groups, per_group)).unwrap();
        let total = groups * (per_group + 1);
        group.bench_with_input(BenchmarkId::from_parameter(total), &list, |b, list| {
            b.iter(|| black_box(list.rows().len()))
        });
    }

    group.finish();
}

fn bench_row_lookup(c: &mut Criterion) {
    let mut group = c.benchmark_group("sourcelist/row_lookup");

    let list = SourceList::new(BenchModel::new(10, 100)).unwrap();
    let last = ItemId::new("c9_99");
    group.bench_function("row_of_last", |b| {
        b.iter(|| black_box(list.row_of(&last)))
    });
    group.bench_function("row_at_last", |b| {
        b.iter(|| black_box(list.row_at(1009).map(|row| row.depth)))
    });

    group.finish();
}

fn bench_rebuild(c: &mut Criterion) {
    let mut group = c.benchmark_group("sourcelist/rebuild");

    // One watched update in one group: the rebuild stays inside g0.
    let model = BenchModel::new(10, 100);
    let mut list = SourceList::with_watched_kinds(model, [EntityKind::new("feed")]).unwrap();
    let batch = ChangeBatch::new().with_updated([ChangedObject::new("c0_50", "feed")]);
    group.bench_function("subtree_101", |b| {
        b.iter(|| {
            list.notify_change(black_box(&batch)).unwrap();
            list.drain_events().count()
        })
    });

    let mut full = SourceList::new(BenchModel::new(10, 100)).unwrap();
    group.bench_function("full_1010", |b| {
        b.iter(|| {
            full.rebuild().unwrap();
            full.drain_events().count()
        })
    });

    group.finish();
}

fn bench_reorder_drop(c: &mut Criterion) {
    let mut group = c.benchmark_group("sourcelist/reorder");

    for per_group in [10usize, 100] {
        let mut list = SourceList::new(BenchModel::new(2, per_group)).unwrap();
        let target = DropTarget::Between {
            parent: Some(ItemId::new("g0")),
            index: 0,
        };
        // Rotate g0's last child to the front: one full drag session plus the
        // dense reindex of the whole group and the subtree rebuild.
        group.bench_with_input(
            BenchmarkId::from_parameter(per_group),
            &target,
            |b, target| {
                b.iter(|| {
                    list.begin_drag(&[per_group]).unwrap();
                    list.accept_drop(target).unwrap();
                    list.drain_events().count()
                })
            },
        );
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_build,
    bench_rows,
    bench_row_lookup,
    bench_rebuild,
    bench_reorder_drop,
);

criterion_main!(benches);
