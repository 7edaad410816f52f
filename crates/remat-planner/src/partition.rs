// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! The partition result and the two-pass orchestrator.
//!
//! A [`Partition`] is a pair of self-contained graphs: the forward graph
//! outputs its original results followed by the saved values, and the
//! backward graph accepts the saved values followed by the tangents. The
//! partition is the contract between the planner and the executors.

use crate::extract::extract_subgraph;
use crate::strategy::Partitioner;
use crate::PlannerError;
use joint_ir::graph::Validated;
use joint_ir::{Arg, Graph, JointGraph};

/// The two executable halves of a partitioned joint graph.
#[derive(Debug, Clone)]
pub struct Partition {
    /// Strategy name that produced this partition.
    pub strategy_name: String,
    /// Placeholders: primal inputs. Outputs: forward outputs, then saved
    /// values.
    pub forward: Graph<Validated>,
    /// Placeholders: saved values, then tangents. Outputs: backward
    /// outputs.
    pub backward: Graph<Validated>,
    /// Names of the values carried from forward to backward, in
    /// joint-graph insertion order.
    pub saved: Vec<String>,
    /// Total bytes crossing the boundary.
    pub saved_bytes: usize,
}

/// Summary of a partition, for logs and reports.
#[derive(Debug, Clone, serde::Serialize)]
pub struct PartitionStats {
    /// Strategy name that produced the partition.
    pub strategy_name: String,
    /// Node count of the forward graph.
    pub forward_nodes: usize,
    /// Node count of the backward graph.
    pub backward_nodes: usize,
    /// Number of saved values.
    pub num_saved: usize,
    /// Total bytes crossing the forward/backward boundary.
    pub saved_bytes: usize,
}

impl Partition {
    /// Returns the number of saved values.
    pub fn num_saved(&self) -> usize {
        self.saved.len()
    }

    /// Returns summary statistics.
    pub fn stats(&self) -> PartitionStats {
        PartitionStats {
            strategy_name: self.strategy_name.clone(),
            forward_nodes: self.forward.num_nodes(),
            backward_nodes: self.backward.num_nodes(),
            num_saved: self.saved.len(),
            saved_bytes: self.saved_bytes,
        }
    }

    /// Checks the interface contract against the joint graph it was
    /// derived from.
    ///
    /// # Checks
    /// - Forward outputs are the joint forward outputs followed by the
    ///   saved values, in order.
    /// - Backward placeholders are the saved values followed by the
    ///   tangents, in order.
    /// - Backward outputs are the joint backward outputs.
    pub fn validate(&self, joint: &JointGraph) -> Result<(), PlannerError> {
        let fail = |detail: String| PlannerError::StrategyFailed {
            strategy: self.strategy_name.clone(),
            detail,
        };

        let mut expected_fwd: Vec<Arg> = joint.forward_outputs().to_vec();
        expected_fwd.extend(self.saved.iter().map(|s| Arg::node(s.as_str())));
        if self.forward.output_values() != expected_fwd.as_slice() {
            return Err(fail("forward outputs do not match outputs + saved".into()));
        }

        let expected_bwd_inputs: Vec<&str> = self
            .saved
            .iter()
            .map(String::as_str)
            .chain(joint.tangent_inputs().iter().map(|n| n.name.as_str()))
            .collect();
        let actual_bwd_inputs: Vec<&str> = self
            .backward
            .placeholders()
            .map(|n| n.name.as_str())
            .collect();
        if actual_bwd_inputs != expected_bwd_inputs {
            return Err(fail("backward placeholders do not match saved + tangents".into()));
        }

        if self.backward.output_values() != joint.backward_outputs() {
            return Err(fail("backward outputs do not match".into()));
        }
        Ok(())
    }

    /// Returns a human-readable summary.
    pub fn summary(&self) -> String {
        let kb = self.saved_bytes as f64 / 1024.0;
        format!(
            "Partition '{}': fwd {} nodes, bwd {} nodes, {} saved values ({:.1} KB across boundary)",
            self.strategy_name,
            self.forward.num_nodes(),
            self.backward.num_nodes(),
            self.saved.len(),
            kb,
        )
    }
}

/// Splits a joint graph into forward and backward subgraphs.
///
/// Runs the strategy, extracts both subgraphs, prunes saved values whose
/// backward placeholder ends up with no consumers (the cut works on
/// per-node granularity, extraction on dependency closures, so the two
/// can disagree), then re-extracts with the pruned set.
///
/// # Errors
///
/// [`PlannerError::Slice`] is fatal: it means the saved-value set or the
/// joint graph is inconsistent. [`PlannerError::Solver`] comes out of the
/// strategy and is recoverable by re-running with [`crate::SaveAll`];
/// [`crate::auto_partition`] does exactly that.
pub fn partition(
    joint: &JointGraph,
    strategy: &dyn Partitioner,
) -> Result<Partition, PlannerError> {
    let saved = strategy.choose_saved_values(joint)?;
    let (_, backward) = extract_pair(joint, &saved)?;

    let pruned: Vec<String> = saved
        .into_iter()
        .filter(|name| !backward.consumers(name).is_empty())
        .collect();
    let dropped = backward.placeholders().count() - pruned.len()
        - joint.tangent_inputs().len();
    if dropped > 0 {
        tracing::debug!("pruned {dropped} saved values unused by the backward graph");
    }

    let (forward, backward) = extract_pair(joint, &pruned)?;

    let saved_bytes = pruned
        .iter()
        .filter_map(|name| joint.graph().node(name))
        .filter_map(|n| n.meta.as_ref())
        .map(|m| m.size_bytes())
        .sum();

    let partition = Partition {
        strategy_name: strategy.name().to_string(),
        forward,
        backward,
        saved: pruned,
        saved_bytes,
    };
    partition.validate(joint)?;
    tracing::info!("{}", partition.summary());
    Ok(partition)
}

/// One extraction round: forward from primals, backward from saved values
/// and tangents.
fn extract_pair(
    joint: &JointGraph,
    saved: &[String],
) -> Result<(Graph<Validated>, Graph<Validated>), PlannerError> {
    let primals: Vec<String> = joint
        .primal_inputs()
        .iter()
        .map(|n| n.name.clone())
        .collect();

    let mut forward_outputs: Vec<Arg> = joint.forward_outputs().to_vec();
    forward_outputs.extend(saved.iter().map(|s| Arg::node(s.as_str())));
    let forward = extract_subgraph(joint.graph(), &primals, &forward_outputs)?;

    let mut backward_inputs: Vec<String> = saved.to_vec();
    backward_inputs.extend(joint.tangent_inputs().iter().map(|n| n.name.clone()));
    let backward = extract_subgraph(joint.graph(), &backward_inputs, joint.backward_outputs())?;

    Ok((forward, backward))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::SaveAll;
    use joint_ir::{GraphBuilder, InputRole};
    use tensor_meta::{DType, TensorMeta};

    fn meta(elems: usize) -> TensorMeta {
        TensorMeta::new(vec![elems], DType::F32)
    }

    /// fwd: b = relu(a), c = mul(b, b); bwd: da = mul(dc, b).
    /// Only `b` is consumed by the backward computation.
    fn joint() -> JointGraph {
        let mut b = GraphBuilder::new();
        b.primal("a", meta(4))
            .tangent("dc", meta(4))
            .call("b", "relu", &["a"], Some(meta(4)))
            .call("c", "mul", &["b", "b"], Some(meta(4)))
            .call("da", "mul", &["dc", "b"], Some(meta(4)))
            .output(&["c", "da"]);
        JointGraph::new(b.build().unwrap(), 1).unwrap()
    }

    /// Strategy stub returning a fixed saved-value list.
    struct Fixed(Vec<&'static str>);
    impl Partitioner for Fixed {
        fn name(&self) -> &str {
            "fixed"
        }
        fn choose_saved_values(&self, _joint: &JointGraph) -> Result<Vec<String>, PlannerError> {
            Ok(self.0.iter().map(|s| s.to_string()).collect())
        }
    }

    #[test]
    fn test_partition_interface() {
        let p = partition(&joint(), &Fixed(vec!["b"])).unwrap();
        assert_eq!(p.saved, vec!["b"]);
        assert_eq!(p.saved_bytes, 16);

        // Forward: placeholder a, outputs [c, b].
        let fwd_inputs: Vec<_> = p.forward.placeholders().map(|n| n.name.clone()).collect();
        assert_eq!(fwd_inputs, vec!["a"]);
        assert_eq!(
            p.forward.output_values(),
            &[Arg::node("c"), Arg::node("b")][..]
        );

        // Backward: placeholders [b, dc] (saved then tangent), output [da].
        let bwd_inputs: Vec<_> = p.backward.placeholders().map(|n| n.name.clone()).collect();
        assert_eq!(bwd_inputs, vec!["b", "dc"]);
        assert_eq!(
            p.backward.node("b").unwrap().input_role(),
            Some(InputRole::Saved)
        );
        assert_eq!(p.backward.output_values(), &[Arg::node("da")][..]);
    }

    #[test]
    fn test_prune_unused_saved_values() {
        // `c` is never consumed backward: the first pass makes it a dead
        // placeholder, the prune drops it, the second pass removes it.
        let p = partition(&joint(), &Fixed(vec!["b", "c"])).unwrap();
        assert_eq!(p.saved, vec!["b"]);
        assert!(!p
            .backward
            .placeholders()
            .any(|n| n.name == "c"));
    }

    #[test]
    fn test_save_all_prunes_to_backward_needs() {
        // SaveAll proposes {a, b, c}; only `b` survives pruning.
        let p = partition(&joint(), &SaveAll::new()).unwrap();
        assert_eq!(p.saved, vec!["b"]);
        assert_eq!(p.strategy_name, "save-all");
    }

    #[test]
    fn test_pruning_is_a_fixed_point() {
        let p1 = partition(&joint(), &SaveAll::new()).unwrap();
        let p2 = partition(&joint(), &Fixed(vec!["b"])).unwrap();
        assert_eq!(p1.saved, p2.saved);
        assert_eq!(p1.forward.nodes(), p2.forward.nodes());
        assert_eq!(p1.backward.nodes(), p2.backward.nodes());
    }

    #[test]
    fn test_bad_saved_value_is_fatal() {
        let err = partition(&joint(), &Fixed(vec!["ghost"])).unwrap_err();
        assert!(matches!(err, PlannerError::Slice(_)));
    }

    #[test]
    fn test_saved_value_directly_output_by_backward() {
        // A saved value that IS a backward output must survive pruning:
        // its only consumer is the output node.
        let mut b = GraphBuilder::new();
        b.primal("a", meta(4))
            .tangent("t", meta(4))
            .call("y", "relu", &["a"], Some(meta(4)))
            .output(&["y", "y"]);
        let joint = JointGraph::new(b.build().unwrap(), 1).unwrap();

        let p = partition(&joint, &Fixed(vec!["y"])).unwrap();
        assert_eq!(p.saved, vec!["y"]);
        assert_eq!(p.backward.output_values(), &[Arg::node("y")][..]);
    }

    #[test]
    fn test_stats_and_summary() {
        let p = partition(&joint(), &Fixed(vec!["b"])).unwrap();
        let stats = p.stats();
        assert_eq!(stats.num_saved, 1);
        assert_eq!(stats.saved_bytes, 16);
        assert_eq!(stats.forward_nodes, p.forward.num_nodes());

        let s = p.summary();
        assert!(s.contains("fixed"));
        assert!(s.contains("1 saved"));

        let json = serde_json::to_string(&stats).unwrap();
        assert!(json.contains("\"num_saved\":1"));
    }
}
