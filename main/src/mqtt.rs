//! MQTT side of the panel: subscribes below the configured topic prefix
//! and forwards messages and control commands to the panel engine without
//! ever blocking on it.

use engine::{DisplayMode, PanelCmdData, PanelHandle};
use lcars_shared::Message;
use rumqttc::{AsyncClient, Event, MqttOptions, Packet, QoS};

use crate::config;

pub fn start(cfg: &config::Mqtt, handle: PanelHandle) {
    let mut options = MqttOptions::new("lcars-panel", &cfg.host, cfg.port);
    options.set_keep_alive(std::time::Duration::from_secs(30));
    if let (Ok(user), Ok(pass)) = (std::env::var("MQTT_USER"), std::env::var("MQTT_PASS")) {
        options.set_credentials(user, pass);
    }

    let prefix = cfg.topic_prefix.clone();
    let (client, mut eventloop) = AsyncClient::new(options, 16);

    tokio::spawn(async move {
        loop {
            match eventloop.poll().await {
                Ok(Event::Incoming(Packet::ConnAck(_))) => {
                    log::info!("Connected to the MQTT broker");
                    if let Err(e) = client
                        .subscribe(format!("{}/#", &prefix), QoS::AtLeastOnce)
                        .await
                    {
                        log::error!("Failed to subscribe to {}/#: {}", &prefix, e);
                    }
                }
                Ok(Event::Incoming(Packet::Publish(publish))) => {
                    if let Some(cmd) = parse_event(&prefix, &publish.topic, &publish.payload) {
                        handle.try_send(cmd);
                    }
                }
                Ok(_) => (),
                Err(e) => {
                    log::error!("MQTT connection error: {}", e);
                    tokio::time::sleep(std::time::Duration::from_secs(2)).await;
                }
            }
        }
    });
}

/// Routes one publish: topics under `{prefix}/control/` carry out-of-band
/// commands, everything else is a panel message.
fn parse_event(prefix: &str, topic: &str, payload: &[u8]) -> Option<PanelCmdData> {
    let control_ns = format!("{}/control/", prefix);
    if let Some(command) = topic.strip_prefix(control_ns.as_str()) {
        return parse_control(command, payload);
    }
    Message::from_payload(topic, payload).map(PanelCmdData::Message)
}

fn parse_control(command: &str, payload: &[u8]) -> Option<PanelCmdData> {
    let payload = String::from_utf8_lossy(payload);
    match command {
        "mode" => match DisplayMode::from_name(&payload) {
            Some(mode) => Some(PanelCmdData::SetMode(mode)),
            None => {
                log::warn!("Unrecognized display mode {:?}, ignoring", payload);
                None
            }
        },
        "debug/layout" => parse_switch(&payload, command).map(PanelCmdData::DebugLayout),
        "debug/touch" => parse_switch(&payload, command).map(PanelCmdData::DebugTouch),
        "clear" => Some(PanelCmdData::ClearHistory),
        other => {
            log::warn!("Unrecognized control command {:?}, ignoring", other);
            None
        }
    }
}

/// `on`/`off` style payloads; an empty payload or `toggle` flips the flag.
fn parse_switch(payload: &str, command: &str) -> Option<Option<bool>> {
    match payload.trim().to_ascii_lowercase().as_str() {
        "on" | "1" | "true" => Some(Some(true)),
        "off" | "0" | "false" => Some(Some(false)),
        "" | "toggle" => Some(None),
        other => {
            log::warn!("Unrecognized switch value {:?} for {}, ignoring", other, command);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PREFIX: &str = "home/lcars_panel";

    #[test]
    fn publishes_outside_the_control_namespace_become_messages() {
        let cmd = parse_event(PREFIX, "home/lcars_panel/door", b"open");
        assert!(matches!(cmd, Some(PanelCmdData::Message(_))));
    }

    #[test]
    fn control_topics_are_commands() {
        assert!(matches!(
            parse_event(PREFIX, "home/lcars_panel/control/mode", b"clock"),
            Some(PanelCmdData::SetMode(DisplayMode::Clock))
        ));
        assert!(matches!(
            parse_event(PREFIX, "home/lcars_panel/control/clear", b""),
            Some(PanelCmdData::ClearHistory)
        ));
        assert!(matches!(
            parse_event(PREFIX, "home/lcars_panel/control/debug/layout", b"on"),
            Some(PanelCmdData::DebugLayout(Some(true)))
        ));
        assert!(matches!(
            parse_event(PREFIX, "home/lcars_panel/control/debug/touch", b"toggle"),
            Some(PanelCmdData::DebugTouch(None))
        ));
    }

    #[test]
    fn unrecognized_commands_are_ignored() {
        assert!(parse_event(PREFIX, "home/lcars_panel/control/reboot", b"now").is_none());
        assert!(parse_event(PREFIX, "home/lcars_panel/control/mode", b"warp").is_none());
        assert!(parse_event(PREFIX, "home/lcars_panel/control/debug/layout", b"maybe").is_none());
    }

    #[test]
    fn malformed_structured_payload_is_dropped() {
        assert!(parse_event(PREFIX, "home/lcars_panel/alerts", br#"{"source":"x"}"#).is_none());
    }

    #[test]
    fn switch_values() {
        assert_eq!(parse_switch("ON", "t"), Some(Some(true)));
        assert_eq!(parse_switch("0", "t"), Some(Some(false)));
        assert_eq!(parse_switch("", "t"), Some(None));
        assert_eq!(parse_switch("toggle", "t"), Some(None));
        assert_eq!(parse_switch("sideways", "t"), None);
    }
}
