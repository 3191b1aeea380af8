// src/mapping.rs

//! Source-to-target package name mapping
//!
//! A fixed table translating RPM-family package names to their Debian-family
//! equivalents, plus the systemd unit to enable on the target when the
//! source ran that package's service. Static configuration, not runtime
//! state; keys are unique.

/// One mapping entry: source package, target package, optional target unit
#[derive(Debug, Clone)]
pub struct MapEntry {
    /// Package identifier as it appears in the source inventory
    pub source: &'static str,
    /// Equivalent package on the target distribution
    pub target: &'static str,
    /// Service unit to enable on the target, if the package provides one
    pub service: Option<&'static str>,
}

/// The full source→target mapping table
#[derive(Debug, Clone)]
pub struct PackageMapping {
    entries: Vec<MapEntry>,
}

impl PackageMapping {
    /// Built-in mapping for the supported distribution pair
    pub fn builtin() -> Self {
        let entries = vec![
            MapEntry { source: "httpd", target: "apache2", service: Some("apache2") },
            MapEntry { source: "nginx", target: "nginx", service: Some("nginx") },
            MapEntry { source: "postgresql-server", target: "postgresql", service: Some("postgresql") },
            MapEntry { source: "mariadb-server", target: "mariadb-server", service: Some("mariadb") },
            MapEntry { source: "mysql-server", target: "default-mysql-server", service: Some("mysql") },
            MapEntry { source: "php-fpm", target: "php-fpm", service: None },
            MapEntry { source: "php", target: "php", service: None },
            MapEntry { source: "vsftpd", target: "vsftpd", service: Some("vsftpd") },
            MapEntry { source: "bind", target: "bind9", service: Some("named") },
            MapEntry { source: "openssh-server", target: "openssh-server", service: Some("ssh") },
            MapEntry { source: "chrony", target: "chrony", service: Some("chrony") },
            MapEntry { source: "cronie", target: "cron", service: Some("cron") },
            MapEntry { source: "rsync", target: "rsync", service: None },
        ];
        Self { entries }
    }

    /// All entries, in table order
    pub fn entries(&self) -> &[MapEntry] {
        &self.entries
    }
}
