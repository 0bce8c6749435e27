//! Uninformed state-space search.
//!
//! A puzzle plugs into the search procedures by implementing [`Problem`];
//! the procedures know nothing else about the domain. Tree search keeps no
//! record of visited states, so a state reachable along several move
//! sequences is expanded once per sequence and a reversible move can make
//! the search run forever unless a [`SearchConfig`] budget stops it.
//! Graph search is the variant that skips already seen states.

use std::collections::HashSet;
use std::hash::Hash;
use std::rc::Rc;
use std::time::{Duration, Instant};

use tracing::{debug, trace, warn};

use crate::frontier::{Frontier, Queue, Stack};

/// A search problem: initial state, transitions, goal and step cost.
pub trait Problem {
    type State: Clone;
    type Action: Clone;

    fn initial(&self) -> &Self::State;

    /// Actions applicable in `state`, in the order children are generated.
    fn actions(&self, state: &Self::State) -> Vec<Self::Action>;

    /// State reached by applying `action` to `state`.
    ///
    /// Only called with actions returned by [`actions`](Self::actions).
    fn result(&self, state: &Self::State, action: &Self::Action) -> Self::State;

    fn goal_test(&self, state: &Self::State) -> bool;

    /// Cost of a path that reached `from` with cost `cost` and then took
    /// `action` to reach `to`. Unit step cost unless overridden.
    fn path_cost(
        &self,
        cost: u64,
        _from: &Self::State,
        _action: &Self::Action,
        _to: &Self::State,
    ) -> u64 {
        cost + 1
    }
}

/// A node of the search tree.
///
/// Children hold a shared, read-only link to their parent, so a node keeps
/// its whole ancestry alive for path reconstruction.
#[derive(Debug)]
pub struct SearchNode<S, A> {
    state: S,
    parent: Option<Rc<SearchNode<S, A>>>,
    action: Option<A>,
    path_cost: u64,
    depth: usize,
}

/// Shared handle to a node of `P`'s search tree.
pub type NodeRef<P> = Rc<SearchNode<<P as Problem>::State, <P as Problem>::Action>>;

impl<S, A> SearchNode<S, A> {
    pub fn root(state: S) -> Self {
        Self {
            state,
            parent: None,
            action: None,
            path_cost: 0,
            depth: 0,
        }
    }

    pub fn state(&self) -> &S {
        &self.state
    }

    pub fn parent(&self) -> Option<&SearchNode<S, A>> {
        self.parent.as_deref()
    }

    /// Action that produced this node, `None` at the root.
    pub fn action(&self) -> Option<&A> {
        self.action.as_ref()
    }

    pub fn path_cost(&self) -> u64 {
        self.path_cost
    }

    /// Number of actions between the root and this node.
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Nodes from the root down to this node.
    pub fn path(&self) -> Vec<&SearchNode<S, A>> {
        let mut path = Vec::with_capacity(self.depth + 1);
        let mut node = Some(self);
        while let Some(current) = node {
            path.push(current);
            node = current.parent();
        }
        path.reverse();
        path
    }

    /// Actions from the root down to this node.
    pub fn solution(&self) -> Vec<A>
    where
        A: Clone,
    {
        self.path()
            .into_iter()
            .filter_map(|node| node.action.clone())
            .collect()
    }
}

impl<S: Clone, A: Clone> SearchNode<S, A> {
    pub fn child<P>(self: &Rc<Self>, problem: &P, action: A) -> Self
    where
        P: Problem<State = S, Action = A>,
    {
        let state = problem.result(&self.state, &action);
        let path_cost = problem.path_cost(self.path_cost, &self.state, &action, &state);
        Self {
            state,
            parent: Some(Rc::clone(self)),
            action: Some(action),
            path_cost,
            depth: self.depth + 1,
        }
    }

    /// Children in the order `problem.actions` lists their actions.
    pub fn expand<P>(self: &Rc<Self>, problem: &P) -> Vec<Rc<Self>>
    where
        P: Problem<State = S, Action = A>,
    {
        problem
            .actions(&self.state)
            .into_iter()
            .map(|action| Rc::new(self.child(problem, action)))
            .collect()
    }
}

// Unlink ancestors iteratively; a recursive drop of a long chain would
// overflow the stack.
impl<S, A> Drop for SearchNode<S, A> {
    fn drop(&mut self) {
        let mut parent = self.parent.take();
        while let Some(node) = parent {
            parent = match Rc::try_unwrap(node) {
                Ok(mut node) => node.parent.take(),
                Err(_) => None,
            };
        }
    }
}

/// Limits checked between node pops.
#[derive(Debug, Clone, Default)]
pub struct SearchConfig {
    /// Wall-clock budget for the whole search.
    pub timeout: Option<Duration>,
    /// Maximum number of nodes to pop from the frontier.
    pub max_nodes: Option<usize>,
}

impl SearchConfig {
    pub fn unbounded() -> Self {
        Self::default()
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn with_max_nodes(mut self, max_nodes: usize) -> Self {
        self.max_nodes = Some(max_nodes);
        self
    }
}

/// Why a search stopped before finding a goal or exhausting the frontier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    Timeout,
    NodeLimit,
}

impl std::fmt::Display for StopReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StopReason::Timeout => write!(f, "timeout"),
            StopReason::NodeLimit => write!(f, "node limit reached"),
        }
    }
}

/// How a search terminated.
#[derive(Debug)]
pub enum SearchOutcome<S, A> {
    /// A goal node; its ancestry is the solution path.
    Solved(Rc<SearchNode<S, A>>),
    /// The frontier ran empty: no solution exists.
    Exhausted,
    /// A budget from [`SearchConfig`] ran out.
    Interrupted(StopReason),
}

/// Outcome of a search together with its statistics.
#[derive(Debug)]
pub struct SearchResult<S, A> {
    pub outcome: SearchOutcome<S, A>,
    /// Nodes popped from the frontier, the goal node included.
    pub nodes_explored: usize,
    /// Nodes left on the frontier when the search stopped.
    pub frontier_size: usize,
    pub elapsed: Duration,
}

impl<S, A> SearchResult<S, A> {
    pub fn solution(&self) -> Option<&Rc<SearchNode<S, A>>> {
        match &self.outcome {
            SearchOutcome::Solved(node) => Some(node),
            _ => None,
        }
    }

    pub fn is_solved(&self) -> bool {
        matches!(self.outcome, SearchOutcome::Solved(_))
    }

    pub fn is_exhausted(&self) -> bool {
        matches!(self.outcome, SearchOutcome::Exhausted)
    }
}

/// Exploration order and duplicate handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Strategy {
    #[default]
    DepthFirstTree,
    BreadthFirstTree,
    DepthFirstGraph,
    BreadthFirstGraph,
}

struct Budget {
    start: Instant,
    deadline: Option<Instant>,
    max_nodes: Option<usize>,
}

impl Budget {
    fn start(config: &SearchConfig) -> Self {
        let start = Instant::now();
        Self {
            start,
            deadline: config.timeout.map(|timeout| start + timeout),
            max_nodes: config.max_nodes,
        }
    }

    fn check(&self, nodes_explored: usize) -> Option<StopReason> {
        if self.max_nodes.is_some_and(|max| nodes_explored >= max) {
            return Some(StopReason::NodeLimit);
        }
        if self.deadline.is_some_and(|deadline| Instant::now() >= deadline) {
            return Some(StopReason::Timeout);
        }
        None
    }

    fn finish<S, A>(
        &self,
        outcome: SearchOutcome<S, A>,
        nodes_explored: usize,
        frontier_size: usize,
    ) -> SearchResult<S, A> {
        let elapsed = self.start.elapsed();
        match &outcome {
            SearchOutcome::Solved(node) => debug!(
                depth = node.depth(),
                nodes_explored, frontier_size, ?elapsed, "goal found"
            ),
            SearchOutcome::Exhausted => {
                debug!(nodes_explored, ?elapsed, "search space exhausted")
            }
            SearchOutcome::Interrupted(reason) => warn!(
                %reason,
                nodes_explored, frontier_size, ?elapsed, "search interrupted"
            ),
        }
        SearchResult {
            outcome,
            nodes_explored,
            frontier_size,
            elapsed,
        }
    }
}

/// Search without a visited set, exploring in `frontier` order.
pub fn tree_search<P, F>(
    problem: &P,
    mut frontier: F,
    config: &SearchConfig,
) -> SearchResult<P::State, P::Action>
where
    P: Problem,
    F: Frontier<NodeRef<P>>,
{
    let budget = Budget::start(config);
    let mut nodes_explored: usize = 0;

    debug!(?config, "starting tree search");
    frontier.push(Rc::new(SearchNode::root(problem.initial().clone())));

    loop {
        // an empty frontier is a definite answer even when the budget is spent
        if frontier.is_empty() {
            return budget.finish(SearchOutcome::Exhausted, nodes_explored, 0);
        }
        if let Some(reason) = budget.check(nodes_explored) {
            let remaining = frontier.len();
            return budget.finish(SearchOutcome::Interrupted(reason), nodes_explored, remaining);
        }
        let Some(node) = frontier.pop() else {
            return budget.finish(SearchOutcome::Exhausted, nodes_explored, 0);
        };
        nodes_explored += 1;

        if problem.goal_test(node.state()) {
            let remaining = frontier.len();
            return budget.finish(SearchOutcome::Solved(node), nodes_explored, remaining);
        }

        let children = node.expand(problem);
        trace!(
            depth = node.depth(),
            children = children.len(),
            frontier = frontier.len(),
            "expanded node"
        );
        frontier.extend(children);
    }
}

/// Search that never pushes a state already explored or already waiting on
/// the frontier.
pub fn graph_search<P, F>(
    problem: &P,
    mut frontier: F,
    config: &SearchConfig,
) -> SearchResult<P::State, P::Action>
where
    P: Problem,
    P::State: Eq + Hash,
    F: Frontier<NodeRef<P>>,
{
    let budget = Budget::start(config);
    let mut nodes_explored: usize = 0;
    let mut explored: HashSet<P::State> = HashSet::new();
    let mut queued: HashSet<P::State> = HashSet::new();

    debug!(?config, "starting graph search");
    let root = Rc::new(SearchNode::root(problem.initial().clone()));
    queued.insert(root.state().clone());
    frontier.push(root);

    loop {
        // an empty frontier is a definite answer even when the budget is spent
        if frontier.is_empty() {
            return budget.finish(SearchOutcome::Exhausted, nodes_explored, 0);
        }
        if let Some(reason) = budget.check(nodes_explored) {
            let remaining = frontier.len();
            return budget.finish(SearchOutcome::Interrupted(reason), nodes_explored, remaining);
        }
        let Some(node) = frontier.pop() else {
            return budget.finish(SearchOutcome::Exhausted, nodes_explored, 0);
        };
        nodes_explored += 1;
        queued.remove(node.state());

        if problem.goal_test(node.state()) {
            let remaining = frontier.len();
            return budget.finish(SearchOutcome::Solved(node), nodes_explored, remaining);
        }
        explored.insert(node.state().clone());

        let mut pushed = 0;
        for child in node.expand(problem) {
            if explored.contains(child.state()) || queued.contains(child.state()) {
                continue;
            }
            queued.insert(child.state().clone());
            frontier.push(child);
            pushed += 1;
        }
        trace!(
            depth = node.depth(),
            children = pushed,
            explored = explored.len(),
            "expanded node"
        );
    }
}

/// Depth-first tree search; the last generated child is explored first.
pub fn depth_first_tree_search<P: Problem>(
    problem: &P,
    config: &SearchConfig,
) -> SearchResult<P::State, P::Action> {
    tree_search(problem, Stack::new(), config)
}

pub fn breadth_first_tree_search<P: Problem>(
    problem: &P,
    config: &SearchConfig,
) -> SearchResult<P::State, P::Action> {
    tree_search(problem, Queue::new(), config)
}

pub fn depth_first_graph_search<P>(problem: &P, config: &SearchConfig) -> SearchResult<P::State, P::Action>
where
    P: Problem,
    P::State: Eq + Hash,
{
    graph_search(problem, Stack::new(), config)
}

pub fn breadth_first_graph_search<P>(
    problem: &P,
    config: &SearchConfig,
) -> SearchResult<P::State, P::Action>
where
    P: Problem,
    P::State: Eq + Hash,
{
    graph_search(problem, Queue::new(), config)
}

/// Run the search procedure selected by `strategy`.
pub fn search<P>(
    problem: &P,
    strategy: Strategy,
    config: &SearchConfig,
) -> SearchResult<P::State, P::Action>
where
    P: Problem,
    P::State: Eq + Hash,
{
    match strategy {
        Strategy::DepthFirstTree => depth_first_tree_search(problem, config),
        Strategy::BreadthFirstTree => breadth_first_tree_search(problem, config),
        Strategy::DepthFirstGraph => depth_first_graph_search(problem, config),
        Strategy::BreadthFirstGraph => breadth_first_graph_search(problem, config),
    }
}
