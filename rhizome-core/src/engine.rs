use rhizome_probe::{Edge, Node, Strategy};
use serde::Serialize;
use std::collections::{HashSet, VecDeque};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::Semaphore;
use tokio::task::JoinHandle;
use tracing::{debug, info};

/// Default size of the background worker pool. Probes are network-bound,
/// so tens of workers saturate long before the CPU does.
pub const DEFAULT_WORKERS: usize = 20;

const IDLE_POLL: Duration = Duration::from_millis(50);

/// Counters describing one consistent view of the engine's state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct EngineStats {
    pub nodes: usize,
    pub edges: usize,
    pub visited: usize,
    pub pending: usize,
    pub in_flight: usize,
}

/// A consistent copy of the discovered graph, safe to iterate while the
/// engine keeps mutating its own collections.
#[derive(Debug, Clone, Default)]
pub struct GraphSnapshot {
    pub nodes: Vec<Node>,
    pub edges: Vec<Edge>,
}

/// Everything the traversal mutates, guarded by one lock: node set, edge
/// set, visited set and the frontier queue. Keeping them together is what
/// makes "expand at most once" hold when workers race on the same node.
#[derive(Default)]
struct GraphState {
    nodes: HashSet<Node>,
    edges: HashSet<Edge>,
    visited: HashSet<Node>,
    queue: VecDeque<(Node, usize)>,
    in_flight: usize,
}

impl GraphState {
    fn clear(&mut self) {
        self.nodes.clear();
        self.edges.clear();
        self.visited.clear();
        self.queue.clear();
    }

    /// Record a node, scheduling it for expansion when it was previously
    /// unknown and its depth is still under the bound. A node already in
    /// the set is never re-queued, whatever depth it resurfaces at: the
    /// first-seen depth wins, even when a shorter path shows up later.
    fn admit(&mut self, node: Node, depth: usize, max_depth: usize) {
        if self.nodes.insert(node.clone()) && depth < max_depth {
            self.queue.push_back((node, depth));
        }
    }

    /// Merge one proposed edge. Duplicate `(source, target, kind)`
    /// triples are dropped; both endpoints are recorded and a newly
    /// introduced target is scheduled one level deeper.
    fn merge_edge(&mut self, edge: Edge, depth: usize, max_depth: usize) {
        if self.edges.contains(&edge) {
            return;
        }
        self.nodes.insert(edge.source.clone());
        self.admit(edge.target.clone(), depth + 1, max_depth);
        self.edges.insert(edge);
    }

    fn stats(&self) -> EngineStats {
        EngineStats {
            nodes: self.nodes.len(),
            edges: self.edges.len(),
            visited: self.visited.len(),
            pending: self.queue.len(),
            in_flight: self.in_flight,
        }
    }
}

/// The discovery engine: owns the graph, enforces the depth bound and
/// runs registered strategies against frontier nodes, either inline
/// (`scan`) or on a bounded background pool (`start`/`stop`).
pub struct Engine {
    state: Arc<Mutex<GraphState>>,
    strategies: Vec<Arc<dyn Strategy>>,
    max_depth: usize,
    workers: usize,
    running: Arc<AtomicBool>,
    dispatcher: Mutex<Option<JoinHandle<()>>>,
}

impl Engine {
    pub fn new(max_depth: usize) -> Self {
        Self {
            state: Arc::new(Mutex::new(GraphState::default())),
            strategies: Vec::new(),
            max_depth,
            workers: DEFAULT_WORKERS,
            running: Arc::new(AtomicBool::new(false)),
            dispatcher: Mutex::new(None),
        }
    }

    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers.max(1);
        self
    }

    /// Strategies run in registration order when a node is expanded; the
    /// order only matters for deterministic output.
    pub fn register_strategy(&mut self, strategy: Arc<dyn Strategy>) {
        self.strategies.push(strategy);
    }

    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    /// Synchronous exhaustive traversal. Clears all state, seeds the
    /// frontier with the root and drains it on the caller's task, one
    /// node at a time. Deterministic given deterministic strategies.
    pub async fn scan(&self, root: Node) {
        info!("Starting scan of {} (max depth {})", root, self.max_depth);
        {
            let mut state = self.state.lock().unwrap();
            state.clear();
            state.admit(root, 0, self.max_depth);
        }

        loop {
            // LIFO pop keeps the walk depth-first, matching the
            // reference traversal; ordering is not a guarantee.
            let entry = self.state.lock().unwrap().queue.pop_back();
            let Some((node, depth)) = entry else { break };
            Self::expand(&self.state, &self.strategies, node, depth, self.max_depth).await;
        }

        let stats = self.stats();
        info!(
            "Scan complete: {} nodes, {} edges, {} expanded",
            stats.nodes, stats.edges, stats.visited
        );
    }

    /// Launch the background dispatcher. Idempotent while running: a
    /// second call is a no-op.
    pub fn start(&self) {
        if self.running.swap(true, Ordering::SeqCst) {
            return;
        }

        let state = self.state.clone();
        let strategies = self.strategies.clone();
        let running = self.running.clone();
        let max_depth = self.max_depth;
        let permits = Arc::new(Semaphore::new(self.workers));

        let handle = tokio::spawn(async move {
            debug!("Dispatcher started");
            while running.load(Ordering::SeqCst) {
                let entry = {
                    let mut st = state.lock().unwrap();
                    match st.queue.pop_front() {
                        Some(entry) => {
                            st.in_flight += 1;
                            Some(entry)
                        }
                        None => None,
                    }
                };

                let Some((node, depth)) = entry else {
                    // Empty frontier is not an error; nap and re-check.
                    tokio::time::sleep(IDLE_POLL).await;
                    continue;
                };

                let permit = permits
                    .clone()
                    .acquire_owned()
                    .await
                    .expect("worker pool semaphore closed");
                let state = state.clone();
                let strategies = strategies.clone();
                tokio::spawn(async move {
                    Self::expand(&state, &strategies, node, depth, max_depth).await;
                    state.lock().unwrap().in_flight -= 1;
                    drop(permit);
                });
            }
            debug!("Dispatcher stopped");
        });

        *self.dispatcher.lock().unwrap() = Some(handle);
    }

    /// Ask the dispatcher to wind down. In-flight expansions finish;
    /// nothing new is dispatched.
    pub fn stop(&self) {
        if self.running.swap(false, Ordering::SeqCst) {
            info!("Stopping background traversal");
        }
    }

    /// Await the dispatcher after `stop`.
    pub async fn join(&self) {
        let handle = self.dispatcher.lock().unwrap().take();
        if let Some(handle) = handle {
            let _ = handle.await;
        }
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    /// Frontier drained and no expansion in flight.
    pub fn is_idle(&self) -> bool {
        let state = self.state.lock().unwrap();
        state.queue.is_empty() && state.in_flight == 0
    }

    /// Record a node and schedule it at the given depth, subject to the
    /// dedup and depth policies.
    pub fn add_node(&self, node: Node, depth: usize) {
        self.state
            .lock()
            .unwrap()
            .admit(node, depth, self.max_depth);
    }

    /// Record an edge discovered while expanding a node at `depth`. Both
    /// endpoints are recorded; the target is scheduled at `depth + 1`.
    pub fn add_edge(&self, edge: Edge, depth: usize) {
        self.state
            .lock()
            .unwrap()
            .merge_edge(edge, depth, self.max_depth);
    }

    pub fn stats(&self) -> EngineStats {
        self.state.lock().unwrap().stats()
    }

    pub fn snapshot(&self) -> GraphSnapshot {
        let state = self.state.lock().unwrap();
        GraphSnapshot {
            nodes: state.nodes.iter().cloned().collect(),
            edges: state.edges.iter().cloned().collect(),
        }
    }

    /// Clear all traversal state without touching registered strategies.
    pub fn reset(&self) {
        self.state.lock().unwrap().clear();
    }

    /// Expand one frontier entry: mark it visited, run every strategy
    /// against it and merge the proposals. A strategy failure contributes
    /// nothing and never aborts the others.
    async fn expand(
        state: &Arc<Mutex<GraphState>>,
        strategies: &[Arc<dyn Strategy>],
        node: Node,
        depth: usize,
        max_depth: usize,
    ) {
        {
            let mut st = state.lock().unwrap();
            if depth >= max_depth {
                return;
            }
            if !st.visited.insert(node.clone()) {
                return;
            }
        }
        debug!("Expanding {} at depth {}", node, depth);

        let mut proposed = Vec::new();
        for strategy in strategies {
            match strategy.execute(&node).await {
                Ok(pairs) => proposed.extend(pairs.into_iter().map(|(_, edge)| edge)),
                Err(err) => {
                    debug!("Strategy {} gave up on {}: {}", strategy.name(), node, err);
                }
            }
        }

        let mut st = state.lock().unwrap();
        // Reversed so the first proposal lands on top of the LIFO
        // frontier used by the synchronous walk.
        for edge in proposed.into_iter().rev() {
            st.merge_edge(edge, depth, max_depth);
        }
    }
}
