//! `grove growth …`: the daily-activity tree.

use anyhow::Result;
use lexigrove_core::growth::{richness, GrowthChange, GrowthPhase, MAX_STAGE};
use lexigrove_core::LearningStore;

/// Record today's activity and report what happened.
pub fn run_check(store: &mut LearningStore) -> Result<()> {
    match store.check_daily_growth()? {
        GrowthChange::Planted => println!("Planted a new tree (stage 1/{})", MAX_STAGE),
        GrowthChange::SameDay => println!("Already watered today."),
        GrowthChange::ClockSkew { days } => {
            println!("Clock is {} day(s) behind the last activity; nothing changed.", -days)
        }
        GrowthChange::Grew {
            days,
            decay,
            stage,
            matured,
        } => {
            if decay > 0 {
                println!("Away {} days: the tree lost {} stage(s).", days, decay);
            }
            if matured {
                println!("The tree matured! A new one starts at stage {}.", stage);
            } else {
                println!("Stage {}/{}", stage, MAX_STAGE);
            }
        }
    }
    Ok(())
}

pub fn run_show(store: &LearningStore) -> Result<()> {
    let growth = store.growth();
    println!("  Phase:        {}", GrowthPhase::of_stage(growth.current_stage).name());
    println!("  Stage:        {}/{}", growth.current_stage, MAX_STAGE);
    println!("  Trees grown:  {}", growth.total_trees);
    println!("  Richness:     {}", richness(growth));
    if growth.last_activity_date > 0 {
        let day = store.options().calendar.date_of(growth.last_activity_date);
        println!("  Last active:  {}", day);
    } else {
        println!("  Last active:  never");
    }
    Ok(())
}

/// Overwrite growth for testing decay by hand.
pub fn run_debug_set(
    store: &mut LearningStore,
    stage: u32,
    total_trees: u32,
    days_ago: i64,
) -> Result<()> {
    store.debug_set_growth(stage, total_trees, days_ago)?;
    let growth = store.growth();
    println!(
        "Growth set: stage {}, {} tree(s), last active {} day(s) ago",
        growth.current_stage, growth.total_trees, days_ago
    );
    Ok(())
}
