pub const HOME: &str = "/home";
pub const LOGIN: &str = "/login";

pub const SEGURANCA: &str = "/seguranca";
pub const USUARIOS: &str = "/seguranca/usuarios";
pub const PERFIS: &str = "/seguranca/perfis";
pub const GRUPOS: &str = "/seguranca/grupos";
pub const RECURSOS: &str = "/seguranca/recursos";
pub const API_TOKENS: &str = "/seguranca/api-tokens";
