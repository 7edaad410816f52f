// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Benchmarks for joint-graph partitioning.

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use joint_ir::{GraphBuilder, JointGraph};
use remat_planner::{auto_partition, PartitionOptions, StrategyKind};
use tensor_meta::{DType, TensorMeta};

/// Builds a joint graph for a depth-`n` pointwise chain with a full
/// backward chain: `y_i = relu(y_{i-1})`, `g_i = mul(g_{i+1}, y_i)`.
fn chain_joint(depth: usize) -> JointGraph {
    let meta = || Some(TensorMeta::new(vec![1024], DType::F32));
    let mut b = GraphBuilder::new();
    b.primal("y0", meta().unwrap());
    for i in 1..=depth {
        let prev = format!("y{}", i - 1);
        b.call(&format!("y{i}"), "relu", &[prev.as_str()], meta());
    }
    b.tangent("t", meta().unwrap());
    let mut grad = "t".to_string();
    for i in (0..depth).rev() {
        let name = format!("g{i}");
        let y = format!("y{i}");
        b.call(&name, "mul", &[grad.as_str(), y.as_str()], meta());
        grad = name;
    }
    let last = format!("y{depth}");
    b.output(&[last.as_str(), grad.as_str()]);
    JointGraph::new(b.build().unwrap(), 1).unwrap()
}

fn bench_min_cut(c: &mut Criterion) {
    let mut group = c.benchmark_group("min_cut_partition");
    for depth in [8usize, 32, 128] {
        let joint = chain_joint(depth);
        group.bench_with_input(BenchmarkId::from_parameter(depth), &joint, |b, joint| {
            b.iter(|| auto_partition(joint, PartitionOptions::default()).unwrap());
        });
    }
    group.finish();
}

fn bench_save_all(c: &mut Criterion) {
    let options = PartitionOptions {
        strategy: StrategyKind::SaveAll,
        ..Default::default()
    };
    let joint = chain_joint(32);
    c.bench_function("save_all_partition", |b| {
        b.iter(|| auto_partition(&joint, options).unwrap());
    });
}

criterion_group!(benches, bench_min_cut, bench_save_all);
criterion_main!(benches);
