//! Translated messages for API responses
//!
//! Messages are looked up by stable key: an [`ErrorCode`] string for
//! failures, or one of the success keys below. Lookups fall back to
//! English, then to the key itself.

use std::collections::HashMap;

use crate::domain::ErrorCode;

pub const USER_CREATED: &str = "user_created";
pub const LOGGED_OUT: &str = "logged_out";
pub const TEAM_UPDATED: &str = "team_updated";
pub const PLAYER_UPDATED: &str = "player_updated";
pub const PLAYER_LISTED: &str = "player_listed";
pub const PLAYER_REMOVED_FROM_LIST: &str = "player_removed_from_list";
pub const TRANSFER_SUCCESS: &str = "transfer_success";

/// Supported response languages
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Locale {
    #[default]
    En,
    Es,
}

impl Locale {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::En => "en",
            Self::Es => "es",
        }
    }

    fn from_primary_tag(tag: &str) -> Option<Self> {
        match tag.to_ascii_lowercase().as_str() {
            "en" => Some(Self::En),
            "es" => Some(Self::Es),
            _ => None,
        }
    }

    /// Pick the best supported language from an `Accept-Language` value
    ///
    /// Region subtags are ignored (`es-AR` selects `es`). Entries are ranked
    /// by quality, ties keep header order, and `q=0` excludes an entry.
    pub fn from_accept_language(header: &str) -> Self {
        let mut best: Option<(Self, f32)> = None;

        for entry in header.split(',') {
            let mut parts = entry.split(';');
            let tag = parts.next().unwrap_or_default().trim();
            let quality = parts
                .filter_map(|param| param.trim().strip_prefix("q="))
                .find_map(|q| q.trim().parse::<f32>().ok())
                .unwrap_or(1.0);

            if quality <= 0.0 {
                continue;
            }

            let primary = tag.split(['-', '_']).next().unwrap_or_default();
            let Some(locale) = Self::from_primary_tag(primary) else {
                continue;
            };

            if best.is_none_or(|(_, q)| quality > q) {
                best = Some((locale, quality));
            }
        }

        best.map(|(locale, _)| locale).unwrap_or_default()
    }
}

const EN: &[(&str, &str)] = &[
    ("invalid_credentials", "Invalid email or password"),
    ("email_exists", "Email already registered"),
    ("invalid_token", "Invalid or expired token"),
    ("team_not_found", "Team not found"),
    ("player_not_found", "Player not found"),
    ("do_not_own_player", "You do not own this player"),
    ("insufficient_funds", "Insufficient funds"),
    ("player_not_for_sale", "Player is not for sale"),
    ("own_player_buy", "You cannot buy your own player"),
    ("unauthorized", "Authentication required"),
    ("email_required", "Email is required"),
    ("invalid_email", "Invalid email format"),
    ("password_short", "Password must be at least 6 characters"),
    ("password_too_long", "Password is too long"),
    ("team_name_required", "Team name is required"),
    ("country_required", "Country is required"),
    ("name_required", "Name is required"),
    ("name_too_long", "Name is too long"),
    ("invalid_price", "Price must be a positive amount"),
    ("invalid_json", "Invalid JSON body"),
    ("internal_error", "Internal server error"),
    ("service_unavailable", "Service temporarily unavailable, please retry"),
    (USER_CREATED, "User created successfully"),
    (LOGGED_OUT, "Logged out successfully"),
    (TEAM_UPDATED, "Team updated successfully"),
    (PLAYER_UPDATED, "Player updated successfully"),
    (PLAYER_LISTED, "Player listed on the transfer market"),
    (PLAYER_REMOVED_FROM_LIST, "Player removed from the transfer market"),
    (TRANSFER_SUCCESS, "Transfer completed successfully"),
];

const ES: &[(&str, &str)] = &[
    ("invalid_credentials", "Correo o contraseña inválidos"),
    ("email_exists", "El correo ya está registrado"),
    ("invalid_token", "Token inválido o expirado"),
    ("team_not_found", "Equipo no encontrado"),
    ("player_not_found", "Jugador no encontrado"),
    ("do_not_own_player", "No eres dueño de este jugador"),
    ("insufficient_funds", "Fondos insuficientes"),
    ("player_not_for_sale", "El jugador no está en venta"),
    ("own_player_buy", "No puedes comprar tu propio jugador"),
    ("unauthorized", "Autenticación requerida"),
    ("email_required", "El correo es obligatorio"),
    ("invalid_email", "Formato de correo inválido"),
    ("password_short", "La contraseña debe tener al menos 6 caracteres"),
    ("password_too_long", "La contraseña es demasiado larga"),
    ("team_name_required", "El nombre del equipo es obligatorio"),
    ("country_required", "El país es obligatorio"),
    ("name_required", "El nombre es obligatorio"),
    ("name_too_long", "El nombre es demasiado largo"),
    ("invalid_price", "El precio debe ser un monto positivo"),
    ("invalid_json", "Cuerpo JSON inválido"),
    ("internal_error", "Error interno del servidor"),
    ("service_unavailable", "Servicio no disponible temporalmente, intenta de nuevo"),
    (USER_CREATED, "Usuario creado exitosamente"),
    (LOGGED_OUT, "Sesión cerrada exitosamente"),
    (TEAM_UPDATED, "Equipo actualizado exitosamente"),
    (PLAYER_UPDATED, "Jugador actualizado exitosamente"),
    (PLAYER_LISTED, "Jugador puesto en el mercado de transferencias"),
    (PLAYER_REMOVED_FROM_LIST, "Jugador retirado del mercado de transferencias"),
    (TRANSFER_SUCCESS, "Transferencia completada exitosamente"),
];

/// Immutable table of translated messages
#[derive(Debug, Clone)]
pub struct MessageCatalog {
    messages: HashMap<Locale, HashMap<&'static str, &'static str>>,
}

impl MessageCatalog {
    pub fn new() -> Self {
        let messages = [(Locale::En, EN), (Locale::Es, ES)]
            .into_iter()
            .map(|(locale, table)| (locale, table.iter().copied().collect()))
            .collect();

        Self { messages }
    }

    pub fn message<'a>(&self, locale: Locale, key: &'a str) -> &'a str {
        let lookup = |locale: Locale| {
            self.messages
                .get(&locale)
                .and_then(|table| table.get(key).copied())
        };

        lookup(locale).or_else(|| lookup(Locale::En)).unwrap_or(key)
    }

    pub fn error_message(&self, locale: Locale, code: ErrorCode) -> &'static str {
        self.message(locale, code.as_str())
    }
}

impl Default for MessageCatalog {
    fn default() -> Self {
        Self::new()
    }
}
