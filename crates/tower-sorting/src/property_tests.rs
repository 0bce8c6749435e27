//! Property tests for the puzzle rules and the search statistics.
//!
//! States are generated from a small palette so that matching tops, and
//! therefore reversible moves, are common.

use proptest::prelude::*;
use proptest::test_runner::Config as ProptestConfig;

use crate::instance::parse_instance;
use crate::problem::TowerSorting;
use crate::replay::{replay, verify_solution};
use crate::search::{
    breadth_first_graph_search, depth_first_graph_search, depth_first_tree_search, Problem,
    SearchConfig, SearchOutcome,
};
use crate::state::{Color, TowerState};

const PALETTE: [&str; 3] = ["R", "G", "B"];

fn arb_state() -> impl Strategy<Value = TowerState> {
    (2usize..=4, 1usize..=4).prop_flat_map(|(tower_count, capacity)| {
        let tower = prop::collection::vec(prop::sample::select(PALETTE.to_vec()), 0..=capacity);
        prop::collection::vec(tower, tower_count).prop_map(move |towers| {
            TowerState::new(
                capacity,
                towers
                    .into_iter()
                    .map(|tower| tower.into_iter().map(Color::new).collect::<Vec<_>>()),
            )
            .unwrap()
        })
    })
}

/// Take one move per entry of `choices`, picking among the legal moves by
/// index, until a state has no moves left.
fn walk(problem: &TowerSorting, choices: &[usize]) -> Vec<TowerState> {
    let mut states = vec![problem.initial().clone()];
    for &choice in choices {
        let current = states.last().unwrap();
        let actions = problem.actions(current);
        if actions.is_empty() {
            break;
        }
        let action = actions[choice % actions.len()];
        let next = problem.result(current, &action);
        states.push(next);
    }
    states
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(128))]

    /// Moves relocate disks; they never create or destroy them, and no
    /// tower ever grows past its capacity.
    #[test]
    fn disks_conserved_and_capacity_respected(
        initial in arb_state(),
        choices in prop::collection::vec(any::<usize>(), 0..40),
    ) {
        let total = initial.disk_count();
        let capacity = initial.capacity();
        let problem = TowerSorting::new(initial);

        for state in walk(&problem, &choices) {
            prop_assert_eq!(state.disk_count(), total);
            prop_assert!(state.towers().iter().all(|tower| tower.len() <= capacity));
        }
    }

    /// Every offered action passes the full rule check and applies cleanly.
    #[test]
    fn offered_actions_are_valid(state in arb_state()) {
        let problem = TowerSorting::new(state.clone());
        for action in problem.actions(&state) {
            prop_assert!(state.check_move(action).is_ok());
            prop_assert!(state.transfer(action).is_ok());
            prop_assert_ne!(action.from, action.to);
        }
    }

    /// Actions come out ordered by (source, target).
    #[test]
    fn actions_are_lexicographic(state in arb_state()) {
        let problem = TowerSorting::new(state.clone());
        let actions = problem.actions(&state);
        let pairs: Vec<(usize, usize)> = actions.iter().map(|mv| (mv.from, mv.to)).collect();
        let mut sorted = pairs.clone();
        sorted.sort();
        prop_assert_eq!(pairs, sorted);
    }

    /// From a goal state, a legal move keeps the goal: the moving disk can
    /// only land on an empty tower or on a tower of its own color.
    #[test]
    fn goal_is_stable_under_legal_moves(state in arb_state()) {
        let problem = TowerSorting::new(state.clone());
        prop_assume!(problem.goal_test(&state));
        for action in problem.actions(&state) {
            prop_assert!(problem.goal_test(&problem.result(&state, &action)));
        }
    }

    /// Graph search terminates on every instance; a found path costs one
    /// per move and replays to a sorted state.
    #[test]
    fn graph_search_paths_replay(state in arb_state()) {
        let problem = TowerSorting::new(state.clone());
        for result in [
            depth_first_graph_search(&problem, &SearchConfig::default()),
            breadth_first_graph_search(&problem, &SearchConfig::default()),
        ] {
            match &result.outcome {
                SearchOutcome::Solved(node) => {
                    let moves = node.solution();
                    prop_assert_eq!(node.path_cost(), moves.len() as u64);
                    prop_assert_eq!(node.depth(), moves.len());
                    prop_assert!(verify_solution(&state, &moves));
                    let report = replay(&state, &moves).unwrap();
                    prop_assert_eq!(&report.final_state, node.state());
                }
                SearchOutcome::Exhausted => {
                    prop_assert_eq!(result.frontier_size, 0);
                }
                SearchOutcome::Interrupted(reason) => {
                    prop_assert!(false, "unbounded search interrupted: {}", reason);
                }
            }
            prop_assert!(result.nodes_explored >= 1);
        }
    }

    /// A bounded tree search never pops more nodes than its budget, and any
    /// path it finds costs one per move.
    #[test]
    fn bounded_tree_search_respects_budget(state in arb_state()) {
        let problem = TowerSorting::new(state);
        let config = SearchConfig::default().with_max_nodes(500);
        let result = depth_first_tree_search(&problem, &config);

        prop_assert!(result.nodes_explored <= 500);
        if let Some(node) = result.solution() {
            prop_assert_eq!(node.path_cost(), node.depth() as u64);
            prop_assert!(verify_solution(problem.initial(), &node.solution()));
        }
    }
}

#[test]
fn bundled_instances_solve() {
    let first = TowerSorting::new(parse_instance(include_str!("../instances/i01.txt")).unwrap());
    let result = depth_first_tree_search(&first, &SearchConfig::default());
    let node = result.solution().unwrap();
    assert_eq!(node.depth(), 2);
    assert_eq!(result.nodes_explored, 3);

    let second = TowerSorting::new(parse_instance(include_str!("../instances/i02.txt")).unwrap());
    let result = depth_first_tree_search(&second, &SearchConfig::default());
    assert_eq!(result.solution().unwrap().depth(), 2);

    let cyclic = TowerSorting::new(parse_instance(include_str!("../instances/i03.txt")).unwrap());
    let result = depth_first_graph_search(&cyclic, &SearchConfig::default());
    assert!(result.is_exhausted());
}
