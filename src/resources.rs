//! Namespace catalog: one typed wrapper per Zabbix API object family.
//!
//! DESIGN
//! ======
//! A single declarative table drives everything: for each namespace it
//! generates the wrapper struct (`HostApi`, `TriggerApi`, ...) with
//! exactly the operations that namespace offers, its [`NamespaceSpec`],
//! the [`CATALOG`] entry used for lookup by name, and the accessor on
//! [`ZabbixClient`]. Operation shapes:
//!
//! - `pass`: forward the parameter bag unchanged.
//! - `by_id`: insert the namespace's id field, then forward.
//! - `delete`: send the ids as a list under the plural id key.
//!
//! Ids and remote method names follow the upstream API reference.

use serde_json::Value;

use super::client::ZabbixClient;
use super::namespace::{Namespace, NamespaceSpec, OpKind};
use super::transport::Transport;
use super::types::{Ids, Params, ZabbixError};

macro_rules! namespace_op {
    (@kind pass) => { OpKind::Pass };
    (@kind by_id) => { OpKind::ById };
    (@kind delete) => { OpKind::Delete };
    (pass $method:ident $namespace:literal $action:literal) => {
        #[doc = concat!("Calls `", $namespace, ".", $action, "` with `params` unchanged.")]
        ///
        /// # Errors
        ///
        /// Propagates transport failures; remote errors come back as `Ok`.
        pub async fn $method(&self, params: Params) -> Result<Value, ZabbixError> {
            self.ns.call($action, params).await
        }
    };
    (by_id $method:ident $namespace:literal $action:literal) => {
        #[doc = concat!("Calls `", $namespace, ".", $action, "` for the object `id`.")]
        ///
        /// # Errors
        ///
        /// Propagates transport failures; remote errors come back as `Ok`.
        pub async fn $method(&self, id: &str, params: Params) -> Result<Value, ZabbixError> {
            self.ns.call_with_id($action, id, params).await
        }
    };
    (delete $method:ident $namespace:literal $action:literal) => {
        #[doc = concat!("Calls `", $namespace, ".", $action, "` with one id or a list of ids.")]
        ///
        /// # Errors
        ///
        /// Propagates transport failures; remote errors come back as `Ok`.
        pub async fn $method(&self, ids: impl Into<Ids>) -> Result<Value, ZabbixError> {
            self.ns.delete($action, ids.into()).await
        }
    };
}

macro_rules! namespaces {
    (
        $(
            $(#[$meta:meta])*
            $accessor:ident => $api:ident($namespace:literal, $id_field:expr $(, unauthenticated: [$($anon:literal),*])?) {
                $( $kind:ident $method:ident = $action:literal; )*
            }
        )*
    ) => {
        $(
            $(#[$meta])*
            #[derive(Clone, Copy)]
            pub struct $api<'a> {
                ns: Namespace<'a>,
            }

            impl<'a> $api<'a> {
                pub const SPEC: NamespaceSpec = NamespaceSpec {
                    namespace: $namespace,
                    id_field: $id_field,
                    actions: &[$(($action, namespace_op!(@kind $kind))),*],
                    unauthenticated: &[$($($anon),*)?],
                };

                #[must_use]
                pub fn new(transport: &'a dyn Transport) -> Self {
                    Self { ns: Namespace::new(transport, Self::SPEC) }
                }

                $( namespace_op!($kind $method $namespace $action); )*
            }
        )*

        /// Every namespace the client knows, in accessor order.
        pub static CATALOG: &[NamespaceSpec] = &[$($api::SPEC),*];

        /// Accessor name to remote namespace, e.g. `host_group` to `hostgroup`.
        pub static ALIASES: &[(&str, &str)] = &[$((stringify!($accessor), $namespace)),*];

        impl ZabbixClient {
            $(
                $(#[$meta])*
                #[must_use]
                pub fn $accessor(&self) -> $api<'_> {
                    $api::new(self.transport())
                }
            )*
        }
    };
}

/// Find a namespace by remote name (`hostgroup`) or accessor name (`host_group`).
#[must_use]
pub fn lookup(name: &str) -> Option<&'static NamespaceSpec> {
    let namespace = ALIASES
        .iter()
        .find(|(accessor, _)| *accessor == name)
        .map_or(name, |(_, namespace)| *namespace);
    CATALOG.iter().find(|spec| spec.namespace == namespace)
}

namespaces! {
    /// Actions (`action.*`).
    action => ActionApi("action", Some("actionid")) {
        pass create = "create";
        delete delete = "delete";
        pass get = "get";
        pass mass_add = "massadd";
    }

    /// Alerts (`alert.*`).
    alert => AlertApi("alert", Some("alertid")) {
        pass get = "get";
    }

    /// API information. `version` is callable before authentication.
    apiinfo => ApiInfoApi("apiinfo", None, unauthenticated: ["version"]) {
        pass version = "version";
    }

    /// Audit log (`auditlog.*`).
    auditlog => AuditLogApi("auditlog", None) {
        pass get = "get";
    }

    /// Authentication settings (`authentication.*`).
    authentication => AuthenticationApi("authentication", None) {
        pass get = "get";
        pass update = "update";
    }

    /// Autoregistration settings (`autoregistration.*`).
    autoregistration => AutoRegistrationApi("autoregistration", None) {
        pass get = "get";
        pass update = "update";
    }

    /// Configuration import and export (`configuration.*`).
    configuration => ConfigurationApi("configuration", None) {
        pass export = "export";
        pass import = "import";
        pass import_compare = "importcompare";
    }

    /// Connectors (`connector.*`).
    connector => ConnectorApi("connector", Some("connectorid")) {
        pass create = "create";
        delete delete = "delete";
        pass get = "get";
        by_id update = "update";
    }

    /// Event correlations (`correlation.*`).
    correlation => CorrelationApi("correlation", Some("correlationid")) {
        pass create = "create";
        delete delete = "delete";
        pass get = "get";
        by_id update = "update";
    }

    /// Dashboards (`dashboard.*`).
    dashboard => DashboardApi("dashboard", Some("dashboardid")) {
        pass create = "create";
        delete delete = "delete";
        pass get = "get";
        by_id update = "update";
    }

    /// Discovered hosts (`dhost.*`).
    discovered_host => DiscoveredHostApi("dhost", Some("dhostid")) {
        pass get = "get";
    }

    /// Discovered services (`dservice.*`).
    discovered_service => DiscoveredServiceApi("dservice", Some("dserviceid")) {
        pass get = "get";
    }

    /// Discovery checks (`dcheck.*`).
    discovery_check => DiscoveryCheckApi("dcheck", Some("dcheckid")) {
        pass get = "get";
    }

    /// Network discovery rules (`drule.*`).
    discovery_rule => DiscoveryRuleApi("drule", Some("druleid")) {
        pass create = "create";
        delete delete = "delete";
        pass get = "get";
        by_id update = "update";
    }

    /// Events (`event.*`).
    event => EventApi("event", Some("eventid")) {
        pass get = "get";
        pass acknowledge = "acknowledge";
    }

    /// Graphs (`graph.*`).
    graph => GraphApi("graph", Some("graphid")) {
        pass create = "create";
        delete delete = "delete";
        pass get = "get";
        by_id update = "update";
    }

    /// Graph items (`graphitem.*`).
    graph_item => GraphItemApi("graphitem", Some("gitemid")) {
        pass get = "get";
    }

    /// Graph prototypes (`graphprototype.*`).
    graph_prototype => GraphPrototypeApi("graphprototype", Some("graphid")) {
        pass create = "create";
        delete delete = "delete";
        pass get = "get";
        by_id update = "update";
    }

    /// High availability cluster nodes (`hanode.*`).
    high_availability_node => HighAvailabilityNodeApi("hanode", Some("ha_nodeid")) {
        pass create = "create";
        delete delete = "delete";
        pass get = "get";
    }

    /// Item history (`history.*`).
    history => HistoryApi("history", None) {
        pass clear = "clear";
        pass get = "get";
        pass push = "push";
    }

    /// Hosts (`host.*`).
    host => HostApi("host", Some("hostid")) {
        pass create = "create";
        delete delete = "delete";
        pass get = "get";
        pass mass_add = "massadd";
        pass mass_remove = "massremove";
        pass mass_update = "massupdate";
        by_id update = "update";
    }

    /// Host groups (`hostgroup.*`).
    host_group => HostGroupApi("hostgroup", Some("groupid")) {
        pass create = "create";
        delete delete = "delete";
        pass get = "get";
        pass mass_add = "massadd";
        pass mass_remove = "massremove";
        pass mass_update = "massupdate";
        by_id update = "update";
    }

    /// Host interfaces (`hostinterface.*`).
    host_interface => HostInterfaceApi("hostinterface", Some("interfaceid")) {
        pass create = "create";
        delete delete = "delete";
        pass get = "get";
        pass mass_add = "massadd";
        pass mass_remove = "massremove";
        pass replace_host_interfaces = "replacehostinterfaces";
        by_id update = "update";
    }

    /// Host prototypes (`hostprototype.*`).
    host_prototype => HostPrototypeApi("hostprototype", Some("hostid")) {
        pass create = "create";
        delete delete = "delete";
        pass get = "get";
        by_id update = "update";
    }

    /// Housekeeping settings (`housekeeping.*`).
    housekeeping => HousekeepingApi("housekeeping", None) {
        pass get = "get";
        pass run = "run";
    }

    /// Icon maps (`iconmap.*`).
    icon_map => IconMapApi("iconmap", Some("iconmapid")) {
        pass create = "create";
        delete delete = "delete";
        pass get = "get";
        by_id update = "update";
    }

    /// Images (`image.*`).
    image => ImageApi("image", Some("imageid")) {
        pass create = "create";
        delete delete = "delete";
        pass get = "get";
        by_id update = "update";
    }

    /// Items (`item.*`).
    item => ItemApi("item", Some("itemid")) {
        pass create = "create";
        delete delete = "delete";
        pass get = "get";
        by_id update = "update";
    }

    /// Item prototypes (`itemprototype.*`).
    item_prototype => ItemPrototypeApi("itemprototype", Some("itemid")) {
        pass create = "create";
        delete delete = "delete";
        pass get = "get";
        by_id update = "update";
    }

    /// Low-level discovery rules (`discoveryrule.*`). LLD rules are items,
    /// hence the `itemid` key.
    lld_rule => LldRuleApi("discoveryrule", Some("itemid")) {
        by_id copy = "copy";
        pass create = "create";
        delete delete = "delete";
        pass get = "get";
        by_id update = "update";
    }

    /// Maintenance periods (`maintenance.*`).
    maintenance => MaintenanceApi("maintenance", Some("maintenanceid")) {
        pass create = "create";
        delete delete = "delete";
        pass get = "get";
        by_id update = "update";
    }

    /// Network maps (`map.*`).
    map => MapApi("map", Some("sysmapid")) {
        pass create = "create";
        delete delete = "delete";
        pass get = "get";
        by_id update = "update";
    }

    /// Media types (`mediatype.*`).
    media_type => MediaTypeApi("mediatype", Some("mediatypeid")) {
        pass create = "create";
        delete delete = "delete";
        pass get = "get";
        by_id update = "update";
    }

    /// Multi-factor authentication methods (`mfa.*`).
    mfa => MfaApi("mfa", Some("mfaid")) {
        pass create = "create";
        delete delete = "delete";
        pass get = "get";
        by_id update = "update";
    }

    /// Frontend modules (`module.*`).
    module => ModuleApi("module", Some("moduleid")) {
        pass create = "create";
        delete delete = "delete";
        pass get = "get";
        by_id update = "update";
    }

    /// Problems (`problem.*`).
    problem => ProblemApi("problem", Some("eventid")) {
        pass get = "get";
    }

    /// Proxies (`proxy.*`).
    proxy => ProxyApi("proxy", Some("proxyid")) {
        pass create = "create";
        delete delete = "delete";
        pass get = "get";
        by_id update = "update";
    }

    /// Proxy groups (`proxygroup.*`).
    proxy_group => ProxyGroupApi("proxygroup", Some("proxy_groupid")) {
        pass create = "create";
        delete delete = "delete";
        pass get = "get";
        by_id update = "update";
    }

    /// Global regular expressions (`regexp.*`).
    regular_expression => RegularExpressionApi("regexp", Some("regexpid")) {
        pass create = "create";
        delete delete = "delete";
        pass get = "get";
        by_id update = "update";
    }

    /// Scheduled reports (`report.*`).
    report => ReportApi("report", Some("reportid")) {
        pass create = "create";
        delete delete = "delete";
        pass get = "get";
        by_id update = "update";
    }

    /// User roles (`role.*`).
    role => RoleApi("role", Some("roleid")) {
        pass create = "create";
        delete delete = "delete";
        pass get = "get";
        by_id update = "update";
    }

    /// Scripts (`script.*`).
    script => ScriptApi("script", Some("scriptid")) {
        pass create = "create";
        delete delete = "delete";
        by_id execute = "execute";
        pass get = "get";
        pass get_scripts_by_events = "getscriptsbyevents";
        pass get_scripts_by_hosts = "getscriptsbyhosts";
        by_id update = "update";
    }

    /// Services (`service.*`).
    service => ServiceApi("service", Some("serviceid")) {
        pass create = "create";
        delete delete = "delete";
        pass get = "get";
        by_id update = "update";
    }

    /// Global settings (`settings.*`).
    settings => SettingsApi("settings", None) {
        pass get = "get";
        pass update = "update";
    }

    /// Service level agreements (`sla.*`).
    sla => SlaApi("sla", Some("slaid")) {
        pass create = "create";
        delete delete = "delete";
        pass get = "get";
        pass get_sli = "getsli";
    }

    /// Tasks (`task.*`).
    task => TaskApi("task", Some("taskid")) {
        pass create = "create";
        pass get = "get";
    }

    /// Templates (`template.*`).
    template => TemplateApi("template", Some("templateid")) {
        pass create = "create";
        delete delete = "delete";
        pass get = "get";
        pass mass_add = "massadd";
        pass mass_remove = "massremove";
        pass mass_update = "massupdate";
        by_id update = "update";
    }

    /// Template dashboards (`templatedashboard.*`).
    template_dashboard => TemplateDashboardApi("templatedashboard", Some("dashboardid")) {
        pass create = "create";
        delete delete = "delete";
        pass get = "get";
        by_id update = "update";
    }

    /// Template groups (`templategroup.*`).
    template_group => TemplateGroupApi("templategroup", Some("groupid")) {
        pass create = "create";
        delete delete = "delete";
        pass get = "get";
        pass mass_add = "massadd";
        pass mass_remove = "massremove";
        pass mass_update = "massupdate";
        pass propagate = "propagate";
        by_id update = "update";
    }

    /// API tokens (`token.*`).
    token => TokenApi("token", Some("tokenid")) {
        pass create = "create";
        delete delete = "delete";
        pass generate = "generate";
        pass get = "get";
        by_id update = "update";
    }

    /// Trends (`trend.*`).
    trend => TrendApi("trend", None) {
        pass get = "get";
    }

    /// Triggers (`trigger.*`).
    trigger => TriggerApi("trigger", Some("triggerid")) {
        pass create = "create";
        delete delete = "delete";
        pass get = "get";
        by_id update = "update";
    }

    /// Trigger prototypes (`triggerprototype.*`).
    trigger_prototype => TriggerPrototypeApi("triggerprototype", Some("triggerid")) {
        pass create = "create";
        delete delete = "delete";
        pass get = "get";
        by_id update = "update";
    }

    /// Users (`user.*`). `login` and `logout` are also wrapped by
    /// [`ZabbixClient::login`] and [`ZabbixClient::close`].
    user => UserApi("user", Some("userid")) {
        pass check_authentication = "checkauthentication";
        pass create = "create";
        delete delete = "delete";
        pass get = "get";
        pass login = "login";
        pass logout = "logout";
        pass provision = "provision";
        pass reset_totp = "resettotp";
        pass unblock = "unblock";
        by_id update = "update";
    }

    /// User directories (`userdirectory.*`).
    user_directory => UserDirectoryApi("userdirectory", Some("userdirectoryid")) {
        pass create = "create";
        delete delete = "delete";
        pass get = "get";
        pass test = "test";
        by_id update = "update";
    }

    /// User groups (`usergroup.*`).
    user_group => UserGroupApi("usergroup", Some("usrgrpid")) {
        pass create = "create";
        delete delete = "delete";
        pass get = "get";
        by_id update = "update";
    }

    /// Host and global user macros (`usermacro.*`).
    user_macro => UserMacroApi("usermacro", Some("hostmacroid")) {
        pass create = "create";
        pass create_global = "createglobal";
        delete delete = "delete";
        pass delete_global = "deleteglobal";
        pass get = "get";
        pass update = "update";
        pass update_global = "updateglobal";
    }

    /// Value maps (`valuemap.*`).
    value_map => ValueMapApi("valuemap", Some("valuemapid")) {
        pass create = "create";
        delete delete = "delete";
        pass get = "get";
        by_id update = "update";
    }

    /// Web scenarios (`httptest.*`).
    web_scenario => WebScenarioApi("httptest", Some("httptestid")) {
        pass create = "create";
        delete delete = "delete";
        pass get = "get";
        by_id update = "update";
    }
}

#[cfg(test)]
#[path = "resources_test.rs"]
mod tests;
