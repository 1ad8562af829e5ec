use crate::domain::params::ForecastParams;
use crate::domain::terminal::{TerminalLimits, TerminalProfile, TICKS, TICK_MIN};

/// Fractional ("expected trucks") state of the terminal at a tick boundary.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SimState {
    /// Waiting outside the gate.
    pub outside_queue: f64,
    /// Admitted but not yet at a bay.
    pub inside_yard: f64,
    /// Part of `inside_yard` held on documentation.
    pub in_docs: f64,
    /// At a bay, i.e. bays occupied.
    pub in_loading: f64,
    pub total_completed: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TickOutput {
    pub state: SimState,
    /// Arrivals that made it past gate rejection this tick.
    pub net_arrivals: f64,
    pub completed: f64,
}

/// States at every tick boundary (`TICKS + 1`, the first being the seed)
/// and the per-tick outputs (`TICKS`).
#[derive(Debug, Clone)]
pub struct SimulationTrace {
    pub states: Vec<SimState>,
    pub outputs: Vec<TickOutput>,
}

impl SimulationTrace {
    pub fn final_state(&self) -> SimState {
        self.states.last().copied().unwrap_or_default()
    }
}

/// Advances the terminal by one tick.
///
/// The order matters: bays release trucks before new assignments are
/// made, and the gate admits against the yard space seen at the start of
/// the tick. Arrivals beyond the outside queue limit are dropped, not
/// carried over.
pub fn step_tick(
    state: &SimState,
    raw_arrivals: f64,
    params: &ForecastParams,
    limits: &TerminalLimits,
    profile: &TerminalProfile,
) -> TickOutput {
    let total_bays = limits.bays();

    // 1. bays release at the loading service rate
    let loading_completions = state.in_loading * (TICK_MIN / params.guarded_loading_minutes());

    // 2. paperwork holds clear at the delayed rate
    let docs_clearing = state.in_docs * (TICK_MIN / profile.docs_clearance_min());

    // 3. ready trucks take whatever bays are free
    let ready_in_yard = (state.inside_yard - state.in_docs).max(0.0);
    let currently_loading = (state.in_loading - loading_completions).max(0.0);
    let available_bays = (total_bays - currently_loading).max(0.0);
    let bay_assigned = ready_in_yard.min(available_bays);

    // 4. gate admits up to its throughput and the remaining yard space
    let yard_space = (limits.inside() - state.inside_yard).max(0.0);
    let entering = profile
        .gate_throughput_per_tick()
        .min(state.outside_queue)
        .min(yard_space);
    let new_docs_stuck = entering * params.docs_delay_fraction();

    // 5. arrivals join the outside queue
    let net_arrivals = raw_arrivals * (1.0 - params.rejection_fraction());
    let new_outside = (state.outside_queue - entering + net_arrivals)
        .max(0.0)
        .min(limits.outside());

    // 6. compose, keeping every field inside its bounds
    let inside_yard = (state.inside_yard + entering - bay_assigned).max(0.0);
    let in_docs = (state.in_docs + new_docs_stuck - docs_clearing)
        .max(0.0)
        .min(inside_yard);
    let in_loading = (currently_loading + bay_assigned).min(total_bays).max(0.0);

    TickOutput {
        state: SimState {
            outside_queue: new_outside,
            inside_yard,
            in_docs,
            in_loading,
            total_completed: state.total_completed + loading_completions,
        },
        net_arrivals,
        completed: loading_completions,
    }
}

/// Runs the full horizon from `initial`.
pub fn run_simulation(
    initial: SimState,
    arrivals: &[f64; TICKS],
    params: &ForecastParams,
    limits: &TerminalLimits,
    profile: &TerminalProfile,
) -> SimulationTrace {
    let mut states = Vec::with_capacity(TICKS + 1);
    let mut outputs = Vec::with_capacity(TICKS);
    states.push(initial);

    let mut state = initial;
    for raw_arrivals in arrivals {
        let output = step_tick(&state, *raw_arrivals, params, limits, profile);
        state = output.state;
        states.push(state);
        outputs.push(output);
    }

    SimulationTrace { states, outputs }
}
