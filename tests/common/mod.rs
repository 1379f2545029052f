#![allow(dead_code)]

use thompson_nfa::nfa::{State, NFA};

// Runs `input` through the NFA by tracking the set of live states.
pub fn accepts(nfa: &NFA, input: &str) -> bool {
    let mut current = nfa.epsilon_closure(&[nfa.get_start()]);
    for c in input.chars() {
        let next: Vec<State> = current
            .iter()
            .flat_map(|state| nfa.get_transitions_from_state(state))
            .filter(|transition| transition.get_symbol() == Some(c))
            .map(|transition| transition.get_to_state())
            .collect();
        current = nfa.epsilon_closure(&next);
        if current.is_empty() {
            return false;
        }
    }
    current.contains(&nfa.get_accept())
}

pub fn edges(nfa: &NFA) -> Vec<(usize, Option<char>, usize)> {
    nfa.transitions()
        .map(|t| {
            (
                t.get_from_state().get_index(),
                t.get_symbol(),
                t.get_to_state().get_index(),
            )
        })
        .collect()
}
