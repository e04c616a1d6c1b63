use anyhow::Result;
use colored::Colorize;
use streamfront_core::routing::{GateState, RouteAccess};

use crate::bootstrap::App;

fn describe(access: RouteAccess) -> String {
    match access {
        RouteAccess::Open => "open".to_string(),
        RouteAccess::PublicOnly => "signed-out visitors only".to_string(),
        RouteAccess::Protected {
            required_role: None,
        } => "sign-in required".to_string(),
        RouteAccess::Protected {
            required_role: Some(role),
        } => format!("sign-in with role {} required", role),
    }
}

pub fn check(app: &App, path: &str) -> Result<()> {
    let Some(matched) = app.routes.resolve(path) else {
        println!("{}", format!("{}: no such route", path).bright_black());
        return Ok(());
    };

    println!(
        "{} -> {} ({})",
        path,
        matched.route.name.bold(),
        describe(matched.route.gate.access())
    );
    for (name, value) in &matched.params {
        println!("  {} = {}", name, value);
    }

    match matched.route.gate.evaluate(&app.session.snapshot()) {
        GateState::Pending => println!("  {}", "pending".yellow()),
        GateState::Allowed => println!("  {}", "allowed".green()),
        GateState::Denied {
            redirect_to,
            reason,
        } => println!(
            "  {}",
            format!("redirect to {} ({})", redirect_to, reason).red()
        ),
    }
    Ok(())
}
