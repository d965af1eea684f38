//! Page-side contract: how requests reach a page's content hook and how
//! pages push messages back.

use popdeck_core::gateway::{ContentRequest, ContentResponse, InboundMessage};
use popdeck_core::{HostError, TabEvent};
use serde_json::Value;

/// Name of the binding pages call to push messages
pub const PUSH_BINDING: &str = "popdeckPush";

/// Reported when a page has no `window.popdeck.handle`
pub const NO_RECEIVER: &str = "Could not establish connection. Receiving end does not exist.";

const MISSING_MARKER: &str = "__popdeckNoReceiver";

/// Name of the binding a page calls when it comes to the front
pub const FOCUS_BINDING: &str = "popdeckFocus";

/// Installed in every document; reports when the tab becomes visible
pub const FOCUS_SCRIPT: &str = r#"(() => {
  if (window.__popdeckFocusHooked) return;
  window.__popdeckFocusHooked = true;
  document.addEventListener("visibilitychange", () => {
    if (document.visibilityState === "visible" && typeof window.popdeckFocus === "function") {
      window.popdeckFocus("visible");
    }
  });
})()"#;

/// Script that hands `request` to the page hook and resolves to its reply
pub fn request_script(request: &ContentRequest) -> Result<String, HostError> {
    let request = serde_json::to_string(request)
        .map_err(|e| HostError::new(format!("Could not encode request: {}", e)))?;

    Ok(format!(
        r#"(async (request) => {{
  const hook = window.popdeck && window.popdeck.handle;
  if (typeof hook !== "function") {{
    return {{ "{marker}": true }};
  }}
  return await hook(request);
}})({request})"#,
        marker = MISSING_MARKER,
        request = request
    ))
}

/// Interpret the value the request script resolved to
pub fn decode_reply(value: Value) -> Result<ContentResponse, HostError> {
    if value.get(MISSING_MARKER).is_some() {
        return Err(HostError::new(NO_RECEIVER));
    }

    serde_json::from_value(value)
        .map_err(|e| HostError::new(format!("Malformed reply from page: {}", e)))
}

/// Parse a binding payload; malformed pushes are dropped
pub fn decode_push(payload: &str) -> Option<InboundMessage> {
    match serde_json::from_str(payload) {
        Ok(message) => Some(message),
        Err(e) => {
            tracing::debug!("Dropping malformed push {:?}: {}", payload, e);
            None
        }
    }
}

/// Map a focus binding call from tab `tab_id` to a tab event
pub fn decode_focus(tab_id: &str, payload: &str) -> Option<TabEvent> {
    match payload {
        "visible" => Some(TabEvent::Activated {
            tab_id: tab_id.to_string(),
        }),
        other => {
            tracing::debug!("Ignoring focus payload {:?} from {}", other, tab_id);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_request_script_embeds_request_json() {
        let request = ContentRequest::new("insertResponse").with("responseText", "Hi \"there\"");
        let script = request_script(&request).unwrap();

        assert!(script.contains("window.popdeck.handle"));
        assert!(script.contains(r#""action":"insertResponse""#));
        assert!(script.contains(r#""responseText":"Hi \"there\"""#));
    }

    #[test]
    fn test_missing_hook_is_no_receiver() {
        let err = decode_reply(json!({ "__popdeckNoReceiver": true })).unwrap_err();
        assert_eq!(err.0, NO_RECEIVER);
    }

    #[test]
    fn test_reply_shapes() {
        let reply = decode_reply(json!({"status": "success", "data": "Jane"})).unwrap();
        assert_eq!(reply, ContentResponse::success(Some("Jane".to_string())));

        let reply = decode_reply(json!({"status": "error"})).unwrap();
        assert!(!reply.is_success());

        assert!(decode_reply(Value::Null).is_err());
        assert!(decode_reply(json!("done")).is_err());
    }

    #[test]
    fn test_decode_push() {
        assert_eq!(
            decode_push(r#"{"type":"linkSaved","data":"https://a.example"}"#),
            Some(InboundMessage::new("linkSaved", "https://a.example"))
        );
        assert_eq!(decode_push("not json"), None);
        assert_eq!(decode_push(r#"{"data":"no type"}"#), None);
    }

    #[test]
    fn test_focus_script_calls_binding_on_visibility_change() {
        assert!(FOCUS_SCRIPT.contains("visibilitychange"));
        assert!(FOCUS_SCRIPT.contains(&format!("window.{}(\"visible\")", FOCUS_BINDING)));
    }

    #[test]
    fn test_decode_focus() {
        assert_eq!(
            decode_focus("A1B2", "visible"),
            Some(TabEvent::Activated {
                tab_id: "A1B2".to_string()
            })
        );
        assert_eq!(decode_focus("A1B2", "hidden"), None);
        assert_eq!(decode_focus("A1B2", ""), None);
    }
}
