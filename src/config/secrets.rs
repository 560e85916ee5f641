//! Secret resolution from the environment.
//!
//! Every entry with an auth kind gets exactly one secret, read from
//! `<NAME>_PASSWORD` or `<NAME>_API_KEY`. Multi-instance sections compose the
//! name as `<SECTION>_<INSTANCE>`, both uppercased.

use crate::config::schema::{AuthKind, ConfigEntry, GatewayConfig};

/// Environment variable holding the secret of kind `auth` for section `name`.
pub fn secret_var(name: &str, auth: AuthKind) -> String {
    format!("{}_{}", name.to_uppercase(), auth.secret_suffix())
}

/// Fill every entry's secret using `lookup`, returning the variable names that
/// were consulted in config order.
///
/// The secret not matching the entry's auth kind is cleared.
pub fn resolve_secrets<F>(config: &mut GatewayConfig, lookup: F) -> Vec<String>
where
    F: Fn(&str) -> Option<String>,
{
    let mut consulted = Vec::new();

    let singletons = [
        ("unifi", config.unifi.as_mut()),
        ("prusalink", config.prusalink.as_mut()),
        ("fibaro", config.fibaro.as_mut()),
        ("pihole", config.pihole.as_mut()),
        ("portainer", config.portainer.as_mut()),
        ("wud", config.wud.as_mut()),
    ];
    for (section, entry) in singletons {
        if let Some(entry) = entry {
            consulted.push(resolve_entry(section, entry, &lookup));
        }
    }

    for (section, instances) in [("osmc", &mut config.osmc), ("tasmota", &mut config.tasmota)] {
        for instance in instances.iter_mut() {
            let name = format!("{}_{}", section, instance.name);
            consulted.push(resolve_entry(&name, &mut instance.entry, &lookup));
        }
    }

    consulted
}

fn resolve_entry<F>(name: &str, entry: &mut ConfigEntry, lookup: &F) -> String
where
    F: Fn(&str) -> Option<String>,
{
    let var = secret_var(name, entry.auth);
    let secret = lookup(&var).filter(|value| !value.is_empty());
    match entry.auth {
        AuthKind::Credentials => {
            entry.password = secret;
            entry.apikey = None;
        }
        AuthKind::Apikey => {
            entry.apikey = secret;
            entry.password = None;
        }
    }
    var
}
