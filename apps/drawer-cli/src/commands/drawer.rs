//! Drawer commands.

use serde::Serialize;

use drawer_core::validation::parse_amount;
use drawer_core::{CoreError, DrawerSnapshot, GoalStatus};

use super::to_json;
use crate::error::CliResult;
use crate::render;
use crate::state::CliState;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct DrawerView {
    index: usize,
    status: GoalStatus,
    #[serde(flatten)]
    drawer: DrawerSnapshot,
}

pub fn show(state: &CliState, index: Option<usize>) -> CliResult<String> {
    let index = index.unwrap_or_else(|| state.session.current_index());
    if state.json {
        let drawer = state.session.drawer(index)?;
        return to_json(&DrawerView {
            index,
            status: GoalStatus::from_difference(drawer.total() - drawer.target()),
            drawer: drawer.snapshot(),
        });
    }
    Ok(render::drawer(&state.session, index)?)
}

pub fn count(state: &mut CliState, kind: &str, value: &str) -> CliResult<String> {
    state.session.set_count_input(kind, value)?;
    show(state, None)
}

pub fn roll_value(state: &mut CliState, kind: &str, value: &str) -> CliResult<String> {
    state.session.set_roll_value_input(kind, value)?;
    show(state, None)
}

pub fn target(state: &mut CliState, value: &str) -> CliResult<String> {
    let amount = parse_amount("target", value).map_err(CoreError::from)?;
    state.session.set_target(amount)?;
    show(state, None)
}

pub fn checkout_target(state: &mut CliState, value: &str) -> CliResult<String> {
    let amount = parse_amount("checkout_target", value).map_err(CoreError::from)?;
    state.session.set_checkout_target(amount)?;
    plan(state, None)
}

pub fn rolls(state: &mut CliState, enabled: bool) -> CliResult<String> {
    state.session.set_use_rolls(enabled)?;
    show(state, None)
}

pub fn clear(state: &mut CliState, index: Option<usize>) -> CliResult<String> {
    let index = index.unwrap_or_else(|| state.session.current_index());
    state.session.clear_drawer(index)?;
    show(state, Some(index))
}

pub fn plan(state: &CliState, index: Option<usize>) -> CliResult<String> {
    let index = index.unwrap_or_else(|| state.session.current_index());
    let recommendation = state.session.plan_for(index)?;
    if state.json {
        return to_json(&recommendation);
    }
    Ok(render::plan(index, &recommendation))
}

pub fn summary(state: &CliState) -> CliResult<String> {
    let rows = state.session.summary();
    if state.json {
        return to_json(&rows);
    }
    Ok(render::summary(&rows, state.session.current_index()))
}

/// Selection lasts for this run only; `--drawer` picks it on the next.
pub fn select(state: &mut CliState, index: usize) -> CliResult<String> {
    state.session.select_drawer(index)?;
    show(state, None)
}

pub fn step(state: &mut CliState, delta: isize) -> CliResult<String> {
    state.session.step_drawer(delta)?;
    show(state, None)
}
