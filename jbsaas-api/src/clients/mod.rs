/// External provider clients
///
/// Each upstream the API server talks to sits behind a trait so handlers
/// never depend on a concrete HTTP client:
///
/// - `content`: AI content generation (OpenAI-compatible chat completions)
/// - `billing`: hosted checkout sessions (Paddle)
/// - `oauth`: authorization-code token exchange with social platforms
///
/// Every trait ships a mock implementation; the server falls back to the
/// mock when the provider's API key is not configured, so development and
/// tests need no upstream accounts.

pub mod billing;
pub mod content;
pub mod oauth;

pub use billing::{CheckoutProvider, CheckoutSession, MockCheckout, PaddleCheckout};
pub use content::{ContentGenerator, GeneratedContent, GenerationRequest, MockGenerator, OpenAiGenerator};
pub use oauth::HttpTokenExchanger;
