use rand::Rng;

/// An operation the simulation can perform. Agent references are catalog indexes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Op {
    /// Select an agent in the main panel.
    Select { agent: usize },
    /// Toggle an agent in compare mode.
    Toggle { agent: usize },
    /// Let virtual time pass so analyses can complete.
    Wait { millis: u64 },
}

/// Generate a random operation over `agents` catalog entries.
///
/// Selections dominate so that superseded analyses are common.
pub fn generate(rng: &mut impl Rng, agents: usize, max_wait_ms: u64) -> Op {
    let roll: u32 = rng.gen_range(0..100);
    match roll {
        0..=44 => Op::Select {
            agent: rng.gen_range(0..agents),
        },
        45..=74 => Op::Toggle {
            agent: rng.gen_range(0..agents),
        },
        _ => Op::Wait {
            millis: rng.gen_range(0..=max_wait_ms),
        },
    }
}
