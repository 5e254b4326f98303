//! Plain-text views of the session for the terminal.

use std::fmt::Write;

use drawer_core::{
    Catalog, CoreResult, DrawerSession, DrawerSummary, GoalStatus, RemovalRecommendation,
};

pub fn drawer(session: &DrawerSession, index: usize) -> CoreResult<String> {
    let drawer = session.drawer(index)?;
    let catalog = session.catalog();
    let mut out = String::new();

    let _ = writeln!(
        out,
        "Drawer {} of {} ({})",
        index,
        session.capacity(),
        session.tier()
    );
    for kind in catalog.active(drawer.use_rolls()) {
        let count = drawer.count(&kind.id);
        let unit = drawer.effective_value(kind);
        let label = if kind.is_roll {
            format!("{} @ {}", kind.label, unit)
        } else {
            kind.label.clone()
        };
        let _ = writeln!(
            out,
            "  {:<22} {:>6}  {:>12}",
            label,
            count,
            unit.times(count).to_string()
        );
    }

    let goal = GoalStatus::from_difference(drawer.total() - drawer.target());
    let _ = writeln!(out, "Total:            {}", drawer.total());
    let _ = writeln!(out, "Goal:             {}", goal.describe(drawer.target()));
    let _ = writeln!(out, "Checkout target:  {}", drawer.checkout_target());
    let _ = write!(
        out,
        "Rolls:            {}",
        if drawer.use_rolls() { "on" } else { "off" }
    );
    Ok(out)
}

pub fn plan(index: usize, plan: &RemovalRecommendation) -> String {
    let mut out = format!("Checkout for drawer {} (leave {})\n", index, plan.checkout_target);
    for message in plan.messages() {
        let _ = writeln!(out, "  {}", message);
    }
    if plan.removed().is_positive() {
        let _ = writeln!(out, "  Total to remove: {}", plan.removed());
    }
    out.trim_end().to_string()
}

pub fn summary(rows: &[DrawerSummary], current: usize) -> String {
    let mut out = format!("{:<8} {:>12} {:>12}  {}\n", "Drawer", "Total", "Target", "Status");
    for row in rows {
        let marker = if row.index == current { "*" } else { " " };
        let _ = writeln!(
            out,
            "{}{:<7} {:>12} {:>12}  {}",
            marker,
            row.index,
            row.total.to_string(),
            row.target.to_string(),
            row.status.short_label()
        );
    }
    out.trim_end().to_string()
}

pub fn status(session: &DrawerSession) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "User:       {}", session.user_id().unwrap_or("guest"));
    let _ = writeln!(out, "Tier:       {}", session.tier());
    let _ = writeln!(
        out,
        "Drawers:    {} available ({} stored)",
        session.capacity(),
        session.drawers().len()
    );
    let _ = write!(
        out,
        "Dark mode:  {}",
        if session.preferences().dark_mode { "on" } else { "off" }
    );
    if let Some(prompt) = session.upgrade_prompt() {
        let _ = write!(out, "\n\n{}\n  -> {}", prompt.message(), prompt.action());
    }
    out
}

pub fn kinds(catalog: &Catalog) -> String {
    catalog
        .kinds()
        .map(|kind| {
            let roll = if kind.is_roll { "  (roll)" } else { "" };
            format!("{:<14} {:<16} {:>10}{}", kind.id, kind.label, kind.face_value.to_string(), roll)
        })
        .collect::<Vec<_>>()
        .join("\n")
}
