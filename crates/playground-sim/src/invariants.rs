use playground_core::{ArbiterStats, Effect, Panel};

/// A violation detected during simulation.
#[derive(Debug, Clone)]
pub struct Violation {
    pub step: usize,
    pub panel: Panel,
    pub invariant: String,
    pub details: String,
}

impl Violation {
    pub fn new(step: usize, panel: Panel, invariant: &str, details: impl Into<String>) -> Self {
        Violation {
            step,
            panel,
            invariant: invariant.to_string(),
            details: details.into(),
        }
    }
}

/// Replay an effect log and check the ordering rules.
///
/// On every panel a `ShowResult` (or an analysis `ShowError`) must answer
/// the newest `ShowPending`, and each pending is answered at most once. A
/// placeholder withdraws whatever was pending.
pub fn check_effect_log(step: usize, effects: &[(Panel, Effect)]) -> Vec<Violation> {
    let mut violations = Vec::new();
    // Per panel: name from the newest `ShowPending` not yet answered.
    let mut awaiting: Vec<(Panel, Option<String>)> = Vec::new();

    for (index, (panel, effect)) in effects.iter().enumerate() {
        let i = match awaiting.iter().position(|(p, _)| p == panel) {
            Some(i) => i,
            None => {
                awaiting.push((*panel, None));
                awaiting.len() - 1
            }
        };
        let pending = &mut awaiting[i].1;

        match effect {
            Effect::ShowPending { name } => {
                *pending = Some(name.clone());
            }
            Effect::ShowResult { name, .. } => match pending.take() {
                Some(expected) if expected == *name => {}
                Some(expected) => violations.push(Violation::new(
                    step,
                    *panel,
                    "stale-result",
                    format!("effect {}: result for '{}' while '{}' is pending", index, name, expected),
                )),
                None => violations.push(Violation::new(
                    step,
                    *panel,
                    "unrequested-result",
                    format!("effect {}: result for '{}' with nothing pending", index, name),
                )),
            },
            Effect::ShowError { message } => {
                if pending.take().is_none() {
                    violations.push(Violation::new(
                        step,
                        *panel,
                        "unrequested-error",
                        format!("effect {}: error '{}' with nothing pending", index, message),
                    ));
                }
            }
            Effect::ShowPlaceholder => {
                *pending = None;
            }
            Effect::ShowWarning { .. } => {
                if *panel != Panel::Main {
                    violations.push(Violation::new(
                        step,
                        *panel,
                        "warning-placement",
                        format!("effect {}: warnings belong on the main panel", index),
                    ));
                }
            }
        }
    }

    violations
}

/// Once settled, nothing may still be waiting for a result.
pub fn check_quiescent(step: usize, effects: &[(Panel, Effect)]) -> Vec<Violation> {
    let mut violations = Vec::new();
    for (panel, last) in last_effects(effects) {
        if let Effect::ShowPending { name } = last {
            violations.push(Violation::new(
                step,
                panel,
                "unresolved-pending",
                format!("'{}' still pending after settle", name),
            ));
        }
    }
    violations
}

/// Last non-warning effect per panel, in first-seen panel order.
pub fn last_effects(effects: &[(Panel, Effect)]) -> Vec<(Panel, Effect)> {
    let mut last: Vec<(Panel, Effect)> = Vec::new();
    for (panel, effect) in effects {
        if matches!(effect, Effect::ShowWarning { .. }) {
            continue;
        }
        match last.iter_mut().find(|(p, _)| p == panel) {
            Some(entry) => entry.1 = effect.clone(),
            None => last.push((*panel, effect.clone())),
        }
    }
    last
}

/// Every issued analysis is accounted for exactly once after settling.
pub fn check_stats(step: usize, panel: Panel, stats: &ArbiterStats) -> Vec<Violation> {
    let resolved = stats.committed + stats.discarded + stats.cancelled + stats.failed;
    if resolved == stats.issued {
        return Vec::new();
    }
    vec![Violation::new(
        step,
        panel,
        "stats-accounting",
        format!("issued {} but resolved {} ({:?})", stats.issued, resolved, stats),
    )]
}
