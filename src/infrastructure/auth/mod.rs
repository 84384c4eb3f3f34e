//! Authentication infrastructure module
//!
//! This module provides JWT token management for access and email confirmation.

mod jwt;

pub use jwt::{JwtClaims, JwtConfig, JwtGenerator, JwtService, TokenType};
