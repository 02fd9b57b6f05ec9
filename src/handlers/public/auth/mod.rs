// handlers/public/auth/mod.rs - Public authentication handlers
//
// Account creation and token acquisition. None of these require a token.

pub mod login;    // POST /api/authentication/login - credentials for a token pair
pub mod refresh;  // POST /api/token/refresh - rotate the refresh token
pub mod register; // POST /api/authentication - create an account

pub use login::login_post;
pub use refresh::refresh_post;
pub use register::register_post;
