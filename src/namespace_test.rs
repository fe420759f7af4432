use super::*;
use crate::params;
use crate::test_helpers::{RecordingTransport, TimeoutTransport};
use serde_json::json;

const WIDGET: NamespaceSpec = NamespaceSpec {
    namespace: "widget",
    id_field: Some("widgetid"),
    actions: &[
        ("get", OpKind::Pass),
        ("update", OpKind::ById),
        ("delete", OpKind::Delete),
        ("ping", OpKind::Pass),
    ],
    unauthenticated: &["ping"],
};

const NO_IDS: NamespaceSpec = NamespaceSpec {
    namespace: "history",
    id_field: None,
    actions: &[("get", OpKind::Pass), ("clear", OpKind::Pass)],
    unauthenticated: &[],
};

#[test]
fn method_joins_namespace_and_action() {
    assert_eq!(WIDGET.method("get"), "widget.get");
    assert_eq!(WIDGET.ids_key().as_deref(), Some("widgetids"));
    assert_eq!(NO_IDS.ids_key(), None);
    assert_eq!(WIDGET.kind("delete"), Some(OpKind::Delete));
    assert_eq!(WIDGET.kind("massadd"), None);
}

#[tokio::test]
async fn call_forwards_params_unchanged() {
    let transport = RecordingTransport::new();
    let ns = Namespace::new(&transport, WIDGET);

    let bag = params!({ "output": ["name"], "filter": { "status": 0 }, "limit": 5 });
    ns.call("get", bag.clone()).await.unwrap();

    let sent = transport.last();
    assert_eq!(sent.method, "widget.get");
    assert_eq!(sent.params, bag);
    assert!(!sent.skip_auth);
}

#[tokio::test]
async fn unauthenticated_action_sets_skip_auth() {
    let transport = RecordingTransport::new();
    let ns = Namespace::new(&transport, WIDGET);

    ns.call("ping", Params::new()).await.unwrap();

    assert!(transport.last().skip_auth);
}

#[tokio::test]
async fn call_with_id_inserts_id_field() {
    let transport = RecordingTransport::new();
    let ns = Namespace::new(&transport, WIDGET);

    ns.call_with_id("update", "42", params!({ "name": "renamed" }))
        .await
        .unwrap();

    assert_eq!(transport.last().params, params!({ "widgetid": "42", "name": "renamed" }));
}

#[tokio::test]
async fn delete_wraps_single_and_many_ids_the_same_way() {
    let transport = RecordingTransport::new();
    let ns = Namespace::new(&transport, WIDGET);

    ns.delete("delete", Ids::from("7")).await.unwrap();
    ns.delete("delete", Ids::from(vec!["7"])).await.unwrap();
    ns.delete("delete", Ids::from(["7", "8"])).await.unwrap();

    let sent = transport.sent();
    assert_eq!(sent[0].params, params!({ "widgetids": ["7"] }));
    assert_eq!(sent[0].params, sent[1].params);
    assert_eq!(sent[2].params, params!({ "widgetids": ["7", "8"] }));
    assert!(sent.iter().all(|s| s.method == "widget.delete"));
}

#[tokio::test]
async fn id_operations_without_id_field_error_before_sending() {
    let transport = RecordingTransport::new();
    let ns = Namespace::new(&transport, NO_IDS);

    let err = ns.delete("clear", Ids::from("1")).await.unwrap_err();
    assert!(matches!(&err, ZabbixError::MissingIdField { namespace } if namespace == "history"));
    let err = ns.call_with_id("clear", "1", Params::new()).await.unwrap_err();
    assert!(matches!(err, ZabbixError::MissingIdField { .. }));
    assert!(transport.sent().is_empty());
}

#[tokio::test]
async fn invoke_rejects_unlisted_action() {
    let transport = RecordingTransport::new();
    let ns = Namespace::new(&transport, WIDGET);

    let err = ns.invoke("massadd", Params::new()).await.unwrap_err();
    assert!(matches!(
        &err,
        ZabbixError::UnsupportedAction { namespace, action } if namespace == "widget" && action == "massadd"
    ));
    assert!(transport.sent().is_empty());
}

// =========================================================================
// Dispatch by name
// =========================================================================

#[tokio::test]
async fn invoke_delete_matches_direct_delete() {
    let transport = RecordingTransport::new();
    let ns = Namespace::new(&transport, WIDGET);

    ns.delete("delete", Ids::from("7")).await.unwrap();
    ns.invoke("delete", params!({ "widgetid": "7" })).await.unwrap();
    ns.invoke("delete", params!({ "widgetids": ["7"] })).await.unwrap();
    ns.invoke("delete", params!({ "ids": "7" })).await.unwrap();
    ns.invoke("delete", params!({ "id": 7 })).await.unwrap();

    let sent = transport.sent();
    assert_eq!(sent.len(), 5);
    assert!(sent.iter().all(|s| s == &sent[0]));
    assert_eq!(sent[0].params, params!({ "widgetids": ["7"] }));
}

#[tokio::test]
async fn invoke_delete_keeps_id_lists() {
    let transport = RecordingTransport::new();
    let ns = Namespace::new(&transport, WIDGET);

    ns.invoke("delete", params!({ "ids": ["7", 8] })).await.unwrap();

    assert_eq!(transport.last().params, params!({ "widgetids": ["7", "8"] }));
}

#[tokio::test]
async fn invoke_delete_rejects_bags_without_clean_ids() {
    let transport = RecordingTransport::new();
    let ns = Namespace::new(&transport, WIDGET);

    for bag in [
        Params::new(),
        params!({ "name": "x" }),
        params!({ "widgetid": "7", "name": "x" }),
        params!({ "widgetids": { "a": 1 } }),
    ] {
        let err = ns.invoke("delete", bag).await.unwrap_err();
        assert!(matches!(&err, ZabbixError::InvalidParams { method, .. } if method == "widget.delete"));
    }
    assert!(transport.sent().is_empty());
}

#[tokio::test]
async fn invoke_update_places_generic_id_under_id_field() {
    let transport = RecordingTransport::new();
    let ns = Namespace::new(&transport, WIDGET);

    ns.call_with_id("update", "42", params!({ "name": "renamed" })).await.unwrap();
    ns.invoke("update", params!({ "id": 42, "name": "renamed" })).await.unwrap();
    ns.invoke("update", params!({ "widgetid": "42", "name": "renamed" })).await.unwrap();

    let sent = transport.sent();
    assert_eq!(sent[1], sent[0]);
    assert_eq!(sent[2], sent[0]);
}

#[tokio::test]
async fn invoke_update_without_id_is_forwarded() {
    let transport = RecordingTransport::new();
    let ns = Namespace::new(&transport, WIDGET);

    ns.invoke("update", params!({ "name": "renamed" })).await.unwrap();

    assert_eq!(transport.last().params, params!({ "name": "renamed" }));
}

#[tokio::test]
async fn response_is_returned_untouched() {
    let canned = json!({ "jsonrpc": "2.0", "result": [{ "widgetid": "1" }], "id": 1 });
    let transport = RecordingTransport::with_responses(vec![canned.clone()]);
    let ns = Namespace::new(&transport, WIDGET);

    let response = ns.invoke("get", Params::new()).await.unwrap();
    assert_eq!(response, canned);
}

#[tokio::test]
async fn transport_failure_propagates_once() {
    let transport = TimeoutTransport::default();
    let ns = Namespace::new(&transport, WIDGET);

    let err = ns.call("get", Params::new()).await.unwrap_err();
    assert!(matches!(err, ZabbixError::Timeout { .. }));
    assert_eq!(transport.attempts(), 1);
}
