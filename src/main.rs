//! Cadence CLI - demo and smoke-test entry point
//!
//! Prints the active configuration and a short sample of the delays and
//! gestures the engine would produce. The real driver links the library.

use gbf_cadence::config::Settings;
use gbf_cadence::humanize::ActionCategory;
use gbf_cadence::Cadence;

fn main() {
    println!("GBF Cadence - human-behavior timing core");
    println!("========================================");
    println!();

    // Defaults plus any environment overrides
    let settings = Settings::from_env();
    let mut cadence = Cadence::new(settings);

    println!("Pacing:");
    println!(
        "  - Click delay: {:.1}s - {:.1}s",
        cadence.settings.pacing.min_click_delay_secs, cadence.settings.pacing.max_click_delay_secs
    );
    println!(
        "  - Break frequency: every {}s",
        cadence.settings.pacing.break_frequency_secs
    );
    println!(
        "  - Session cap: {}s",
        cadence.settings.pacing.max_session_secs
    );
    println!(
        "  - Fatigue: {}",
        if cadence.settings.pacing.enable_fatigue {
            "enabled"
        } else {
            "disabled"
        }
    );
    println!();

    println!("Sample delays:");
    for category in [
        ActionCategory::Click,
        ActionCategory::Battle,
        ActionCategory::Reading,
        ActionCategory::Navigation,
    ] {
        let delay = cadence.pacer.get_delay(category);
        println!("  - {:<12} {:.2}s", category.label(), delay.as_secs_f64());
    }
    println!();

    match cadence.plan_click(200, 80) {
        Ok(plan) => println!(
            "Sample click on a 200x80 region: offset ({}, {}) after {:.2}s",
            plan.dx,
            plan.dy,
            plan.pre_delay.as_secs_f64()
        ),
        Err(e) => println!("Click planning failed: {e}"),
    }

    let stats = cadence.pacer.get_session_stats();
    println!(
        "Session so far: {} actions, fatigue {:.3}x",
        stats.total_actions, stats.current_fatigue
    );
}
