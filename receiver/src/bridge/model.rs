use serde::{Deserialize, Serialize};
use sweepcore::processing::EngineCommand;

/// Body of `POST /controls`; absent fields leave the view unchanged.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ControlRequest {
    #[serde(default)]
    pub max_hold: Option<bool>,
    #[serde(default)]
    pub waterfall: Option<bool>,
}

impl ControlRequest {
    pub fn into_commands(self) -> Vec<EngineCommand> {
        let mut commands = Vec::new();
        if let Some(enabled) = self.max_hold {
            commands.push(EngineCommand::SetMaxHold(enabled));
        }
        if let Some(enabled) = self.waterfall {
            commands.push(EngineCommand::SetWaterfall(enabled));
        }
        commands
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ControlResponse {
    pub status: String,
    pub applied: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_present_toggles_become_commands() {
        let request: ControlRequest = serde_json::from_str(r#"{"waterfall": false}"#).unwrap();
        assert_eq!(
            request.into_commands(),
            vec![EngineCommand::SetWaterfall(false)]
        );
        assert!(ControlRequest::default().into_commands().is_empty());
    }
}
