use std::fmt;

use serde::Serialize;

/// Game mode advertised by a directory entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GameMode {
    Versus,
    Custom,
    Campaign,
    Survival,
    Unknown,
}

impl GameMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            GameMode::Versus => "Versus",
            GameMode::Custom => "Custom",
            GameMode::Campaign => "Campaign",
            GameMode::Survival => "Survival",
            GameMode::Unknown => "Unknown",
        }
    }
}

impl From<u32> for GameMode {
    fn from(mode: u32) -> Self {
        match mode {
            1 => GameMode::Versus,
            2 => GameMode::Custom,
            3 => GameMode::Campaign,
            4 => GameMode::Survival,
            _ => GameMode::Unknown,
        }
    }
}

impl fmt::Display for GameMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Stable identity of a server in a listing.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct ServerKey {
    pub address: String,
    pub port: u16,
}

impl fmt::Display for ServerKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.address, self.port)
    }
}

/// One game server advertised by the directory service.
///
/// Values are read-only once built. Country codes are not stored here; resolve
/// them through a [`CountryCache`](crate::CountryCache).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Server {
    address_ipv4: String,
    address_ipv6: Option<String>,
    local_ip: Option<String>,
    port: u16,
    game_name: String,
    game_mode: u32,
    map_name: String,
    players: u32,
    max_players: u32,
    bots: u32,
    has_password: bool,
    description: String,
    version: String,
    version_nr: u32,
    application_instance: Option<String>,
}

impl Server {
    pub fn builder(address_ipv4: impl Into<String>, port: u16) -> ServerBuilder {
        ServerBuilder::new(address_ipv4, port)
    }

    pub fn address_ipv4(&self) -> &str {
        &self.address_ipv4
    }

    pub fn address_ipv6(&self) -> Option<&str> {
        self.address_ipv6.as_deref()
    }

    pub fn local_ip(&self) -> Option<&str> {
        self.local_ip.as_deref()
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub fn game_name(&self) -> &str {
        &self.game_name
    }

    pub fn game_mode(&self) -> u32 {
        self.game_mode
    }

    pub fn map_name(&self) -> &str {
        &self.map_name
    }

    pub fn players(&self) -> u32 {
        self.players
    }

    pub fn max_players(&self) -> u32 {
        self.max_players
    }

    pub fn bots(&self) -> u32 {
        self.bots
    }

    pub fn has_password(&self) -> bool {
        self.has_password
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    pub fn version_nr(&self) -> u32 {
        self.version_nr
    }

    pub fn application_instance(&self) -> Option<&str> {
        self.application_instance.as_deref()
    }

    pub fn mode(&self) -> GameMode {
        GameMode::from(self.game_mode)
    }

    /// Human-readable game mode, "Unknown" for unmapped values.
    pub fn game_mode_name(&self) -> &'static str {
        self.mode().as_str()
    }

    pub fn is_full(&self) -> bool {
        self.players >= self.max_players
    }

    pub fn connection_string(&self) -> String {
        format!("{}:{}", self.address_ipv4, self.port)
    }

    pub fn key(&self) -> ServerKey {
        ServerKey {
            address: self.address_ipv4.clone(),
            port: self.port,
        }
    }

    /// Short summary suitable for sharing a server with other players.
    pub fn game_info(&self) -> String {
        format!(
            "Game Name: {}\nGame Mode: {}\nPlayers: {}/{}\nVersion: {}",
            self.game_name,
            self.game_mode_name(),
            self.players,
            self.max_players,
            self.version
        )
    }
}

impl fmt::Display for Server {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Server({}, {}, {})",
            self.game_name, self.address_ipv4, self.port
        )
    }
}

/// Builder for [`Server`]; every field not set keeps its directory default.
#[derive(Debug, Clone)]
pub struct ServerBuilder {
    server: Server,
}

impl ServerBuilder {
    pub fn new(address_ipv4: impl Into<String>, port: u16) -> Self {
        Self {
            server: Server {
                address_ipv4: address_ipv4.into(),
                address_ipv6: None,
                local_ip: None,
                port,
                game_name: String::new(),
                game_mode: 0,
                map_name: String::new(),
                players: 0,
                max_players: 0,
                bots: 0,
                has_password: false,
                description: String::new(),
                version: String::new(),
                version_nr: 0,
                application_instance: None,
            },
        }
    }

    pub fn with_address_ipv6(mut self, address: Option<String>) -> Self {
        self.server.address_ipv6 = address;
        self
    }

    pub fn with_local_ip(mut self, local_ip: Option<String>) -> Self {
        self.server.local_ip = local_ip;
        self
    }

    pub fn with_game_name(mut self, name: impl Into<String>) -> Self {
        self.server.game_name = name.into();
        self
    }

    pub fn with_game_mode(mut self, mode: u32) -> Self {
        self.server.game_mode = mode;
        self
    }

    pub fn with_map_name(mut self, map: impl Into<String>) -> Self {
        self.server.map_name = map.into();
        self
    }

    pub fn with_players(mut self, players: u32, max_players: u32) -> Self {
        self.server.players = players;
        self.server.max_players = max_players;
        self
    }

    pub fn with_bots(mut self, bots: u32) -> Self {
        self.server.bots = bots;
        self
    }

    pub fn with_password(mut self, has_password: bool) -> Self {
        self.server.has_password = has_password;
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.server.description = description.into();
        self
    }

    pub fn with_version(mut self, version: impl Into<String>, version_nr: u32) -> Self {
        self.server.version = version.into();
        self.server.version_nr = version_nr;
        self
    }

    pub fn with_application_instance(mut self, instance: Option<String>) -> Self {
        self.server.application_instance = instance;
        self
    }

    pub fn build(self) -> Server {
        self.server
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_game_mode_names() {
        let names: Vec<_> = (0..6)
            .map(|mode| Server::builder("1.2.3.4", 1).with_game_mode(mode).build())
            .map(|s| s.game_mode_name())
            .collect();

        assert_eq!(
            names,
            vec!["Unknown", "Versus", "Custom", "Campaign", "Survival", "Unknown"]
        );
    }

    #[test]
    fn test_is_full() {
        let open = Server::builder("1.2.3.4", 1).with_players(3, 8).build();
        let full = Server::builder("1.2.3.4", 1).with_players(8, 8).build();
        let empty = Server::builder("1.2.3.4", 1).build();

        assert!(!open.is_full());
        assert!(full.is_full());
        // 0 >= 0 counts as full
        assert!(empty.is_full());
    }

    #[test]
    fn test_connection_string_and_key() {
        let server = Server::builder("10.0.0.5", 10101).build();

        assert_eq!(server.connection_string(), "10.0.0.5:10101");
        assert_eq!(server.key().to_string(), "10.0.0.5:10101");
        assert_eq!(
            server.key(),
            ServerKey {
                address: "10.0.0.5".to_string(),
                port: 10101
            }
        );
    }

    #[test]
    fn test_game_info_and_display() {
        let server = Server::builder("10.0.0.5", 10101)
            .with_game_name("Brawl")
            .with_game_mode(1)
            .with_players(2, 8)
            .with_version("v.1.3.7d", 17)
            .build();

        assert_eq!(
            server.game_info(),
            "Game Name: Brawl\nGame Mode: Versus\nPlayers: 2/8\nVersion: v.1.3.7d"
        );
        assert_eq!(server.to_string(), "Server(Brawl, 10.0.0.5, 10101)");
    }
}
