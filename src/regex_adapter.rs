// Regex engine adapter: intersection, containment and finiteness over the
// anchored regular languages JSON Schema's `pattern` keyword describes.
//
// Built on `regex-automata`'s dense DFA, the sibling crate to `regex` in
// the same family the teacher crate already depends on for its builtins.
// Dense DFAs give us exactly the three primitives this module needs "for
// free": containment via complement-then-intersect-then-check-emptiness,
// intersection via a product automaton, and finiteness via cycle
// detection over reachable (non-dead) states.

use std::time::Instant;

use regex_automata::dfa::{dense, Automaton};
use regex_automata::util::start;
use regex_automata::Anchored;

use crate::error::{Result, SchemaError};

const DEFAULT_STATE_CAP: usize = 1 << 16;

/// `Err(Undecided)` once `deadline` has passed. Checked on every BFS/DFS
/// iteration in the product-automaton searches below, alongside the
/// per-call state cap, so a configured deadline bounds these searches
/// the same way it bounds the object decider's property loop.
fn check_deadline(deadline: Option<Instant>) -> Result<()> {
    if let Some(dl) = deadline {
        if Instant::now() >= dl {
            return Err(SchemaError::Undecided);
        }
    }
    Ok(())
}

/// Rewrites a JSON Schema `pattern` into its unanchored, substring-match
/// normal form (spec §3's "unanchored normal form"): `p` becomes `.*p.*`
/// unless it begins with `^` and/or ends with `$`, in which case that
/// side is left bare instead of wrapped.
pub fn unanchor(pattern: &str) -> String {
    let starts_anchored = pattern.starts_with('^');
    let ends_anchored = pattern.ends_with('$') && !pattern.ends_with("\\$");

    let body_start = if starts_anchored { 1 } else { 0 };
    let body_end = if ends_anchored {
        pattern.len() - 1
    } else {
        pattern.len()
    };
    let body = &pattern[body_start..body_end];

    let mut out = String::with_capacity(body.len() + 8);
    if !starts_anchored {
        out.push_str(".*");
    }
    out.push_str(body);
    if !ends_anchored {
        out.push_str(".*");
    }
    out
}

struct BoundedDfa {
    dfa: dense::DFA<Vec<u32>>,
}

fn build_dfa(pattern: &str, state_cap: usize) -> Result<BoundedDfa> {
    let dfa = dense::Builder::new()
        .configure(dense::Config::new().dfa_size_limit(Some(state_cap.saturating_mul(64))))
        .build(pattern)
        .map_err(|e| SchemaError::RegexUnsupported(format!("{pattern}: {e}")))?;
    Ok(BoundedDfa { dfa })
}

/// `L(p) ⊆ L(q)`, computed as `L(p) ∩ complement(L(q)) = ∅`.
pub fn contains(p: &str, q: &str) -> Result<bool> {
    contains_with_cap(p, q, DEFAULT_STATE_CAP, None)
}

pub fn contains_with_cap(p: &str, q: &str, state_cap: usize, deadline: Option<Instant>) -> Result<bool> {
    let dp = build_dfa(p, state_cap)?;
    let dq = build_dfa(q, state_cap)?;
    Ok(!product_has_accepting_complement(&dp, &dq, state_cap, deadline)?)
}

/// `L(p) ∩ L(q) ≠ ∅`.
pub fn intersects(p: &str, q: &str) -> Result<bool> {
    intersects_with_cap(p, q, DEFAULT_STATE_CAP, None)
}

pub fn intersects_with_cap(p: &str, q: &str, state_cap: usize, deadline: Option<Instant>) -> Result<bool> {
    let dp = build_dfa(p, state_cap)?;
    let dq = build_dfa(q, state_cap)?;
    product_has_accepting(&dp, &dq, state_cap, deadline)
}

/// Whether `L(p)` is a finite set, decided by cycle detection over the
/// reachable, non-dead states of its minimised-by-construction DFA.
pub fn is_finite(p: &str) -> Result<bool> {
    is_finite_with_cap(p, DEFAULT_STATE_CAP, None)
}

pub fn is_finite_with_cap(p: &str, state_cap: usize, deadline: Option<Instant>) -> Result<bool> {
    let d = build_dfa(p, state_cap)?;
    Ok(!has_cycle_to_accepting(&d, state_cap, deadline)?)
}

/// Does the literal string `s` match pattern `p`?
pub fn matches(p: &str, s: &str) -> Result<bool> {
    let dfa = dense::Builder::new().build(p).map_err(|e| SchemaError::RegexUnsupported(format!("{p}: {e}")))?;
    let config = start::Config::new().anchored(Anchored::Yes);
    let mut state = dfa
        .start_state(&config)
        .map_err(|e| SchemaError::RegexUnsupported(e.to_string()))?;
    for &b in s.as_bytes() {
        state = dfa.next_state(state, b);
    }
    state = dfa.next_eoi_state(state);
    Ok(dfa.is_match_state(state))
}

fn product_has_accepting(
    a: &BoundedDfa,
    b: &BoundedDfa,
    state_cap: usize,
    deadline: Option<Instant>,
) -> Result<bool> {
    use std::collections::{HashSet, VecDeque};

    let cfg = start::Config::new().anchored(Anchored::Yes);
    let s0a = a
        .dfa
        .start_state(&cfg)
        .map_err(|e| SchemaError::RegexUnsupported(e.to_string()))?;
    let s0b = b
        .dfa
        .start_state(&cfg)
        .map_err(|e| SchemaError::RegexUnsupported(e.to_string()))?;

    let mut seen: HashSet<(u32, u32)> = HashSet::new();
    let mut queue: VecDeque<(u32, u32)> = VecDeque::new();
    let key = |sid: regex_automata::util::primitives::StateID| sid.as_u32();
    seen.insert((key(s0a), key(s0b)));
    queue.push_back((key(s0a), key(s0b)));

    while let Some((ka, kb)) = queue.pop_front() {
        check_deadline(deadline)?;
        if seen.len() > state_cap {
            return Err(SchemaError::RegexUnsupported(
                "product automaton exceeded the configured DFA state cap".into(),
            ));
        }
        let sa = regex_automata::util::primitives::StateID::new(ka as usize)
            .map_err(|e| SchemaError::RegexUnsupported(e.to_string()))?;
        let sb = regex_automata::util::primitives::StateID::new(kb as usize)
            .map_err(|e| SchemaError::RegexUnsupported(e.to_string()))?;

        let eoi_a = a.dfa.next_eoi_state(sa);
        let eoi_b = b.dfa.next_eoi_state(sb);
        if a.dfa.is_match_state(eoi_a) && b.dfa.is_match_state(eoi_b) {
            return Ok(true);
        }

        if a.dfa.is_dead_state(sa) || b.dfa.is_dead_state(sb) {
            continue;
        }

        for byte in 0u16..=255 {
            let byte = byte as u8;
            let na = a.dfa.next_state(sa, byte);
            let nb = b.dfa.next_state(sb, byte);
            if a.dfa.is_dead_state(na) && b.dfa.is_dead_state(nb) {
                continue;
            }
            let nk = (key(na), key(nb));
            if seen.insert(nk) {
                queue.push_back(nk);
            }
        }
    }
    Ok(false)
}

/// Whether the product of `a` and `not b` reaches an accepting state --
/// used by [`contains`]: `p ⊄ q` iff some string is in `L(p)` but not
/// `L(q)`, i.e. `L(p) ∩ complement(L(q)) ≠ ∅`.
fn product_has_accepting_complement(
    a: &BoundedDfa,
    b: &BoundedDfa,
    state_cap: usize,
    deadline: Option<Instant>,
) -> Result<bool> {
    use std::collections::{HashSet, VecDeque};

    let cfg = start::Config::new().anchored(Anchored::Yes);
    let s0a = a
        .dfa
        .start_state(&cfg)
        .map_err(|e| SchemaError::RegexUnsupported(e.to_string()))?;
    let s0b = b
        .dfa
        .start_state(&cfg)
        .map_err(|e| SchemaError::RegexUnsupported(e.to_string()))?;

    let key = |sid: regex_automata::util::primitives::StateID| sid.as_u32();
    let mut seen: HashSet<(u32, u32)> = HashSet::new();
    let mut queue: VecDeque<(u32, u32)> = VecDeque::new();
    seen.insert((key(s0a), key(s0b)));
    queue.push_back((key(s0a), key(s0b)));

    while let Some((ka, kb)) = queue.pop_front() {
        check_deadline(deadline)?;
        if seen.len() > state_cap {
            return Err(SchemaError::RegexUnsupported(
                "product automaton exceeded the configured DFA state cap".into(),
            ));
        }
        let sa = regex_automata::util::primitives::StateID::new(ka as usize)
            .map_err(|e| SchemaError::RegexUnsupported(e.to_string()))?;
        let sb = regex_automata::util::primitives::StateID::new(kb as usize)
            .map_err(|e| SchemaError::RegexUnsupported(e.to_string()))?;

        let eoi_a = a.dfa.next_eoi_state(sa);
        let eoi_b = b.dfa.next_eoi_state(sb);
        // b's complement accepts here iff b itself does NOT.
        if a.dfa.is_match_state(eoi_a) && !b.dfa.is_match_state(eoi_b) {
            return Ok(true);
        }

        if a.dfa.is_dead_state(sa) {
            continue;
        }

        for byte in 0u16..=255 {
            let byte = byte as u8;
            let na = a.dfa.next_state(sa, byte);
            let nb = b.dfa.next_state(sb, byte);
            if a.dfa.is_dead_state(na) {
                continue;
            }
            let nk = (key(na), key(nb));
            if seen.insert(nk) {
                queue.push_back(nk);
            }
        }
    }
    Ok(false)
}

/// Cycle detection over reachable non-dead states, restricted to cycles
/// that can still reach an accepting state -- those are the ones that
/// certify an infinite language.
fn has_cycle_to_accepting(d: &BoundedDfa, state_cap: usize, deadline: Option<Instant>) -> Result<bool> {
    use std::collections::HashMap;

    let cfg = start::Config::new().anchored(Anchored::Yes);
    let s0 = d
        .dfa
        .start_state(&cfg)
        .map_err(|e| SchemaError::RegexUnsupported(e.to_string()))?;

    #[derive(Clone, Copy, PartialEq, Eq)]
    enum Color {
        White,
        Gray,
        Black,
    }

    let mut color: HashMap<u32, Color> = HashMap::new();
    let mut reaches_accept: HashMap<u32, bool> = HashMap::new();
    let mut found_cycle = false;
    let mut visited_count = 0usize;

    fn key(sid: regex_automata::util::primitives::StateID) -> u32 {
        sid.as_u32()
    }

    #[allow(clippy::too_many_arguments)]
    fn dfs(
        d: &BoundedDfa,
        sid: regex_automata::util::primitives::StateID,
        color: &mut HashMap<u32, Color>,
        reaches_accept: &mut HashMap<u32, bool>,
        found_cycle: &mut bool,
        visited_count: &mut usize,
        state_cap: usize,
        deadline: Option<Instant>,
    ) -> Result<bool> {
        if *found_cycle {
            return Ok(true);
        }
        check_deadline(deadline)?;
        *visited_count += 1;
        if *visited_count > state_cap {
            return Err(SchemaError::RegexUnsupported(
                "DFA exceeded the configured state cap during finiteness check".into(),
            ));
        }
        let k = key(sid);
        color.insert(k, Color::Gray);

        let eoi = d.dfa.next_eoi_state(sid);
        let mut reaches = d.dfa.is_match_state(eoi);

        if !d.dfa.is_dead_state(sid) {
            for byte in 0u16..=255 {
                let byte = byte as u8;
                let next = d.dfa.next_state(sid, byte);
                if d.dfa.is_dead_state(next) {
                    continue;
                }
                let nk = key(next);
                match color.get(&nk).copied() {
                    Some(Color::Gray) => {
                        // Back edge: a cycle. It certifies infiniteness
                        // only if the cycle can reach an accepting state.
                        *found_cycle = true;
                        reaches = true;
                    }
                    Some(Color::Black) => {
                        reaches = reaches || *reaches_accept.get(&nk).unwrap_or(&false);
                    }
                    _ => {
                        let child_reaches = dfs(
                            d,
                            next,
                            color,
                            reaches_accept,
                            found_cycle,
                            visited_count,
                            state_cap,
                            deadline,
                        )?;
                        reaches = reaches || child_reaches;
                    }
                }
            }
        }

        color.insert(k, Color::Black);
        reaches_accept.insert(k, reaches);
        Ok(reaches)
    }

    dfs(
        d,
        s0,
        &mut color,
        &mut reaches_accept,
        &mut found_cycle,
        &mut visited_count,
        state_cap,
        deadline,
    )?;
    Ok(found_cycle)
}

/// Builds the regex for the length interval `Σ^[min,max]` (spec §4.5),
/// so that "pattern intersected with a length range" becomes just another
/// conjunct the product-automaton machinery below can use uniformly.
fn length_regex(min: u64, max: Option<u64>) -> String {
    match max {
        Some(max) => format!("(?s)^.{{{min},{max}}}$"),
        None => format!("(?s)^.{{{min},}}$"),
    }
}

fn build_many(patterns: &[String], state_cap: usize) -> Result<Vec<BoundedDfa>> {
    patterns.iter().map(|p| build_dfa(p, state_cap)).collect()
}

/// Does `L(patterns_p) ∩ Σ^[min_p,max_p]` (a conjunction of all `patterns_p`
/// plus the length interval) fit inside the analogous conjunction for
/// `patterns_q`/`[min_q,max_q]`? This is the operation §4.5 needs: string
/// containment reduces to emptiness of the source conjunction minus each
/// individual target conjunct, because `X ⊆ A ∩ B ∩ ... ⟺ X ⊆ A ∧ X ⊆ B ∧ ...`.
#[allow(clippy::too_many_arguments)]
pub fn conjunction_contains(
    patterns_p: &[String],
    min_p: u64,
    max_p: Option<u64>,
    patterns_q: &[String],
    min_q: u64,
    max_q: Option<u64>,
    state_cap: usize,
    deadline: Option<Instant>,
) -> Result<bool> {
    let mut source_patterns: Vec<String> = patterns_p.to_vec();
    source_patterns.push(length_regex(min_p, max_p));
    let sources = build_many(&source_patterns, state_cap)?;

    let mut target_patterns: Vec<String> = patterns_q.to_vec();
    target_patterns.push(length_regex(min_q, max_q));

    for target_pattern in &target_patterns {
        let target = build_dfa(target_pattern, state_cap)?;
        if !multi_contains_single(&sources, &target, state_cap, deadline)? {
            return Ok(false);
        }
    }
    Ok(true)
}

/// True if `L(source₁) ∩ L(source₂) ∩ ... ⊆ L(target)`.
fn multi_contains_single(
    sources: &[BoundedDfa],
    target: &BoundedDfa,
    state_cap: usize,
    deadline: Option<Instant>,
) -> Result<bool> {
    use std::collections::{HashMap, VecDeque};

    let cfg = start::Config::new().anchored(Anchored::Yes);
    let mut start_key = Vec::with_capacity(sources.len() + 1);
    for s in sources {
        let sid = s
            .dfa
            .start_state(&cfg)
            .map_err(|e| SchemaError::RegexUnsupported(e.to_string()))?;
        start_key.push(sid.as_u32());
    }
    let target_start = target
        .dfa
        .start_state(&cfg)
        .map_err(|e| SchemaError::RegexUnsupported(e.to_string()))?;
    start_key.push(target_start.as_u32());

    let mut seen: HashMap<Vec<u32>, ()> = HashMap::new();
    let mut queue: VecDeque<Vec<u32>> = VecDeque::new();
    seen.insert(start_key.clone(), ());
    queue.push_back(start_key);

    let to_id = |raw: u32| regex_automata::util::primitives::StateID::new(raw as usize);

    while let Some(key) = queue.pop_front() {
        check_deadline(deadline)?;
        if seen.len() > state_cap {
            return Err(SchemaError::RegexUnsupported(
                "product automaton exceeded the configured DFA state cap".into(),
            ));
        }
        let (source_ids_raw, target_id_raw) = key.split_at(sources.len());
        let target_id_raw = target_id_raw[0];

        let mut source_ids = Vec::with_capacity(source_ids_raw.len());
        for &raw in source_ids_raw {
            source_ids.push(to_id(raw).map_err(|e| SchemaError::RegexUnsupported(e.to_string()))?);
        }
        let target_id = to_id(target_id_raw).map_err(|e| SchemaError::RegexUnsupported(e.to_string()))?;

        let all_sources_accept = sources
            .iter()
            .zip(source_ids.iter())
            .all(|(d, &sid)| d.dfa.is_match_state(d.dfa.next_eoi_state(sid)));
        let target_accepts = target.dfa.is_match_state(target.dfa.next_eoi_state(target_id));

        if all_sources_accept && !target_accepts {
            return Ok(false); // witness: accepted by every source, rejected by target
        }

        let any_source_dead = source_ids
            .iter()
            .zip(sources.iter())
            .any(|(&sid, d)| d.dfa.is_dead_state(sid));
        if any_source_dead {
            continue;
        }

        for byte in 0u16..=255 {
            let byte = byte as u8;
            let mut next_key = Vec::with_capacity(sources.len() + 1);
            let mut all_dead = true;
            for (d, &sid) in sources.iter().zip(source_ids.iter()) {
                let next = d.dfa.next_state(sid, byte);
                if !d.dfa.is_dead_state(next) {
                    all_dead = false;
                }
                next_key.push(next.as_u32());
            }
            if all_dead {
                continue;
            }
            let next_target = target.dfa.next_state(target_id, byte);
            next_key.push(next_target.as_u32());
            if seen.insert(next_key.clone(), ()).is_none() {
                queue.push_back(next_key);
            }
        }
    }
    Ok(true)
}
