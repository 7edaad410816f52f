// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Example: compare partitioning strategies on a synthetic joint graph.
//!
//! Demonstrates the trade-off the planner exists for: min-cut planning
//! carries far fewer bytes across the forward/backward boundary than
//! save-everything, at the price of recomputing cheap operations.
//!
//! ```bash
//! cargo run -p remat-planner --example strategy_comparison
//! ```

use joint_ir::{GraphBuilder, JointGraph};
use remat_planner::{auto_partition, PartitionOptions, StrategyKind};
use tensor_meta::{DType, TensorMeta};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialise tracing.
    tracing_subscriber::fmt().with_env_filter("info").init();

    let joint = build_joint(8, 4096);
    println!("Joint graph: {}\n", joint.graph().summary());

    println!("{:<16} {:>8} {:>8} {:>8} {:>14}", "Strategy", "Fwd", "Bwd", "Saved", "Boundary KB");
    println!("{}", "-".repeat(60));

    for strategy in [StrategyKind::SaveAll, StrategyKind::MinCut] {
        let options = PartitionOptions {
            strategy,
            ..Default::default()
        };
        let p = auto_partition(&joint, options)?;
        let stats = p.stats();
        println!(
            "{:<16} {:>8} {:>8} {:>8} {:>14.1}",
            stats.strategy_name,
            stats.forward_nodes,
            stats.backward_nodes,
            stats.num_saved,
            stats.saved_bytes as f64 / 1024.0,
        );
    }

    // Show the min-cut result in full.
    let p = auto_partition(&joint, PartitionOptions::default())?;
    println!("\n{}\n", p.summary());
    println!("forward {}", p.forward);
    println!("backward {}", p.backward);

    Ok(())
}

/// Builds a joint graph of `blocks` relu/mul blocks over `[elems]`-sized
/// tensors, with a matmul head and the matching backward chain.
fn build_joint(blocks: usize, elems: usize) -> JointGraph {
    let meta = || Some(TensorMeta::new(vec![elems], DType::F32));
    let mut b = GraphBuilder::new();
    b.primal("x0", meta().unwrap());

    for i in 0..blocks {
        let x = format!("x{i}");
        let r = format!("r{i}");
        let next = format!("x{}", i + 1);
        b.call(&r, "relu", &[x.as_str()], meta());
        b.call(&next, "mul", &[r.as_str(), x.as_str()], meta());
    }
    let top = format!("x{blocks}");
    b.call("logits", "matmul", &[top.as_str(), top.as_str()], meta());

    b.tangent("dlogits", meta().unwrap());
    b.call("dtop", "matmul_backward", &["dlogits", top.as_str()], meta());
    let mut grad = "dtop".to_string();
    for i in (0..blocks).rev() {
        let x = format!("x{i}");
        let r = format!("r{i}");
        let dr = format!("dr{i}");
        let dx = format!("dx{i}");
        b.call(&dr, "mul", &[grad.as_str(), x.as_str()], meta());
        b.call(&dx, "threshold_backward", &[dr.as_str(), x.as_str()], meta());
        grad = dx;
    }
    b.output(&["logits", grad.as_str()]);
    JointGraph::new(b.build().unwrap(), 1).unwrap()
}
