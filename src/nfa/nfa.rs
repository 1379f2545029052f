use crate::error_handling::Result;
use crate::parser::ast_node::ast_node::Expression;
use indexmap::IndexSet;
use serde_yaml::{Mapping, Value};
use std::fmt::Debug;
use std::sync::Arc;
use tracing::debug;

/// Handle of a state inside an [`NFA`]. Only meaningful for the NFA that created it.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct State(usize);

impl State {
    pub fn get_index(&self) -> usize {
        self.0
    }
}

#[derive(Clone, Eq, PartialEq)]
pub struct Transition {
    from: State,
    to: State,
    symbol: Option<char>,
}

impl Transition {
    pub fn get_from_state(&self) -> State {
        self.from
    }

    pub fn get_to_state(&self) -> State {
        self.to
    }

    /// The character consumed by this transition, or `None` for an epsilon transition.
    pub fn get_symbol(&self) -> Option<char> {
        self.symbol
    }

    pub fn is_epsilon(&self) -> bool {
        self.symbol.is_none()
    }
}

impl Debug for Transition {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self.symbol {
            None => write!(f, "{:?} -> {:?}, symbol: epsilon", self.from, self.to),
            Some(c) => write!(f, "{:?} -> {:?}, symbol: {:?}", self.from, self.to, c),
        }
    }
}

struct StateNode {
    // The expression node this state was allocated for. Diagnostic only.
    source: Arc<Expression>,
    // A multimap: several transitions may carry the same label.
    transitions: Vec<Transition>,
}

/// Start and end of a sub-automaton under construction.
///
/// When a fragment is returned, `end` has no outgoing transitions. Only the
/// caller that composes fragments may attach transitions to `end`.
struct Fragment {
    start: State,
    end: State,
}

enum CompileOp<'a> {
    // Lower a node: leaves directly, composites by scheduling their operands.
    Visit(&'a Arc<Expression>),
    // All operands of this node are lowered; link their fragments.
    Combine(&'a Arc<Expression>),
}

/// An epsilon-NFA produced by Thompson's construction.
///
/// States live in an arena owned by the NFA and are addressed by [`State`].
/// The NFA has exactly one start state and one accept state.
pub struct NFA {
    start: State,
    accept: State,
    states: Vec<StateNode>,
}

impl NFA {
    /// Compiles `expression` into a fresh NFA.
    ///
    /// The construction is deterministic: compiling the same tree twice yields the
    /// same state numbering and the same transition order.
    pub fn from_expression(expression: &Arc<Expression>) -> NFA {
        let mut nfa = NFA {
            start: State(0),
            accept: State(0),
            states: Vec::with_capacity(2 * expression.get_num_nodes()),
        };
        let fragment = nfa.add_expression(expression);
        nfa.start = fragment.start;
        nfa.accept = fragment.end;

        debug!(
            kind = expression.get_kind_name(),
            num_states = nfa.get_num_states(),
            num_transitions = nfa.get_num_transitions(),
            "compiled expression into NFA"
        );
        nfa
    }

    // Post-order over a heap work stack; nesting depth never reaches the thread
    // stack. Operands are laid out left then right, before the node's own states.
    fn add_expression(&mut self, expression: &Arc<Expression>) -> Fragment {
        let mut work: Vec<CompileOp> = vec![CompileOp::Visit(expression)];
        let mut fragments: Vec<Fragment> = Vec::new();

        while let Some(op) = work.pop() {
            match op {
                CompileOp::Visit(exp) => match exp.as_ref() {
                    Expression::Empty => {
                        let start = self.new_state(exp);
                        let end = self.new_state(exp);
                        self.add_epsilon_transition(start, end);
                        fragments.push(Fragment { start, end });
                    }
                    Expression::Symbol(c) => {
                        let start = self.new_state(exp);
                        let end = self.new_state(exp);
                        self.add_symbol_transition(start, *c, end);
                        fragments.push(Fragment { start, end });
                    }
                    Expression::Union(l, r) | Expression::Concatenation(l, r) => {
                        work.push(CompileOp::Combine(exp));
                        work.push(CompileOp::Visit(r));
                        work.push(CompileOp::Visit(l));
                    }
                    Expression::Iteration(inner) => {
                        work.push(CompileOp::Combine(exp));
                        work.push(CompileOp::Visit(inner));
                    }
                },
                CompileOp::Combine(exp) => {
                    let fragment = self.combine(exp, &mut fragments);
                    fragments.push(fragment);
                }
            }
        }

        fragments
            .pop()
            .expect("compiling an expression leaves exactly one fragment")
    }

    // Links the operand fragments on top of `fragments` for a composite node.
    fn combine(
        &mut self,
        expression: &Arc<Expression>,
        fragments: &mut Vec<Fragment>,
    ) -> Fragment {
        let mut pop = || fragments.pop().expect("operand fragment is on the stack");
        match expression.as_ref() {
            Expression::Union(_, _) => {
                let r = pop();
                let l = pop();
                let start = self.new_state(expression);
                let end = self.new_state(expression);
                self.add_epsilon_transition(start, l.start);
                self.add_epsilon_transition(start, r.start);
                self.add_epsilon_transition(l.end, end);
                self.add_epsilon_transition(r.end, end);
                Fragment { start, end }
            }
            Expression::Concatenation(_, _) => {
                let r = pop();
                let l = pop();
                self.add_epsilon_transition(l.end, r.start);
                Fragment {
                    start: l.start,
                    end: r.end,
                }
            }
            Expression::Iteration(_) => {
                let inner = pop();
                let start = self.new_state(expression);
                let end = self.new_state(expression);
                self.add_epsilon_transition(start, inner.start);
                self.add_epsilon_transition(start, end);
                self.add_epsilon_transition(inner.end, start);
                self.add_epsilon_transition(inner.end, end);
                Fragment { start, end }
            }
            Expression::Empty | Expression::Symbol(_) => {
                unreachable!("leaf expressions are lowered on visit")
            }
        }
    }

    fn new_state(&mut self, source: &Arc<Expression>) -> State {
        let state = State(self.states.len());
        self.states.push(StateNode {
            source: source.clone(),
            transitions: Vec::new(),
        });
        state
    }

    fn add_transition(&mut self, transition: Transition) {
        debug_assert!(transition.to.0 < self.states.len());
        self.states[transition.from.0].transitions.push(transition);
    }

    fn add_epsilon_transition(&mut self, from: State, to: State) {
        self.add_transition(Transition {
            from,
            to,
            symbol: None,
        });
    }

    fn add_symbol_transition(&mut self, from: State, symbol: char, to: State) {
        self.add_transition(Transition {
            from,
            to,
            symbol: Some(symbol),
        });
    }
}

impl NFA {
    pub fn get_start(&self) -> State {
        self.start
    }

    pub fn get_accept(&self) -> State {
        self.accept
    }

    pub fn get_num_states(&self) -> usize {
        self.states.len()
    }

    pub fn get_num_transitions(&self) -> usize {
        self.states.iter().map(|s| s.transitions.len()).sum()
    }

    pub fn get_states(&self) -> impl Iterator<Item = State> {
        (0..self.states.len()).map(State)
    }

    /// Outgoing transitions of `state` in insertion order. Unknown states have none.
    pub fn get_transitions_from_state(&self, state: &State) -> &[Transition] {
        self.states
            .get(state.0)
            .map(|node| node.transitions.as_slice())
            .unwrap_or(&[])
    }

    /// Every transition of the NFA, grouped by source state in state order.
    pub fn transitions(&self) -> impl Iterator<Item = &Transition> {
        self.states.iter().flat_map(|node| node.transitions.iter())
    }

    pub fn get_state_source(&self, state: &State) -> Option<&Arc<Expression>> {
        self.states.get(state.0).map(|node| &node.source)
    }

    /// Symbols appearing on any transition, in first-seen order.
    pub fn get_alphabet(&self) -> IndexSet<char> {
        self.transitions().filter_map(|t| t.symbol).collect()
    }

    /// All states reachable from `states` through epsilon transitions only,
    /// including the given states themselves. Order follows discovery.
    pub fn epsilon_closure(&self, states: &[State]) -> Vec<State> {
        let mut closure: IndexSet<State> = IndexSet::new();
        let mut stack: Vec<State> = states.iter().rev().copied().collect();

        while let Some(state) = stack.pop() {
            if !closure.insert(state) {
                continue;
            }
            for transition in self.get_transitions_from_state(&state).iter().rev() {
                if transition.is_epsilon() && !closure.contains(&transition.to) {
                    stack.push(transition.to);
                }
            }
        }

        closure.into_iter().collect()
    }

    /// Serializes the graph as YAML. Epsilon transitions have a null symbol.
    pub fn to_yaml(&self) -> Result<String> {
        let mut states = Vec::with_capacity(self.states.len());
        for (idx, node) in self.states.iter().enumerate() {
            let transitions: Vec<Value> = node
                .transitions
                .iter()
                .map(|t| {
                    let mut edge = Mapping::new();
                    edge.insert(
                        "symbol".into(),
                        t.symbol.map_or(Value::Null, |c| Value::String(c.to_string())),
                    );
                    edge.insert("to".into(), Value::from(t.to.0));
                    Value::Mapping(edge)
                })
                .collect();

            let mut state = Mapping::new();
            state.insert("id".into(), Value::from(idx));
            state.insert("source".into(), node.source.get_kind_name().into());
            state.insert("transitions".into(), Value::Sequence(transitions));
            states.push(Value::Mapping(state));
        }

        let mut root = Mapping::new();
        root.insert("start".into(), Value::from(self.start.0));
        root.insert("accept".into(), Value::from(self.accept.0));
        root.insert("states".into(), Value::Sequence(states));
        Ok(serde_yaml::to_string(&Value::Mapping(root))?)
    }
}

/// Compiles `expression` by Thompson's construction. See [`NFA::from_expression`].
pub fn compile(expression: &Arc<Expression>) -> NFA {
    NFA::from_expression(expression)
}

impl Debug for NFA {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "NFA( start: {:?}, accept: {:?}, num_states: {}, transitions: {{\n",
            self.start,
            self.accept,
            self.states.len()
        )?;

        for (idx, node) in self.states.iter().enumerate() {
            if node.transitions.is_empty() {
                continue;
            }
            write!(f, "\t{:?} ({}):\n", State(idx), node.source.get_kind_name())?;
            for transition in node.transitions.iter() {
                write!(f, "\t\t{:?}\n", transition)?;
            }
        }

        write!(f, "}} )")
    }
}
