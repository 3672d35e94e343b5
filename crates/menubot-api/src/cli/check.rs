//! `menubot check` -- validate the configured flow table.

use anyhow::Result;
use console::style;

use menubot_core::flow::FlowRegistry;
use menubot_types::error::RegistryError;

/// Report which required states are missing. Fails when any are.
pub fn check_flows(flows: &FlowRegistry, json: bool) -> Result<()> {
    let missing = match flows.validate() {
        Ok(()) => Vec::new(),
        Err(RegistryError::MissingStates(states)) => states,
        Err(e) => return Err(e.into()),
    };

    if json {
        let report = serde_json::json!({
            "flows": flows.len(),
            "required": FlowRegistry::required_states(),
            "missing": missing,
            "valid": missing.is_empty(),
        });
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!();
        let check_mark = |ok: bool| {
            if ok {
                format!("{}", style("✓").green())
            } else {
                format!("{}", style("✗").red())
            }
        };
        for state in FlowRegistry::required_states() {
            let ok = !missing.contains(&state);
            println!("  {} {}", check_mark(ok), state);
        }
        println!();
    }

    if !missing.is_empty() {
        return Err(RegistryError::MissingStates(missing).into());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use menubot_types::flow::Flow;

    #[test]
    fn test_builtin_table_passes() {
        assert!(check_flows(&FlowRegistry::builtin(), true).is_ok());
    }

    #[test]
    fn test_incomplete_table_fails() {
        let flows = FlowRegistry::new(vec![Flow::new("welcome", "menu")]).unwrap();
        let err = check_flows(&flows, true).unwrap_err();
        assert!(err.to_string().contains("collecting_data"));
    }
}
