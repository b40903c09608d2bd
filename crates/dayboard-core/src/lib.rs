//! # Dayboard Core Library
//!
//! Four small single-page apps (a D-day calculator, a D-day list, an
//! image-prompt helper and a countdown timer) and the rerun host they share.
//!
//! ## Architecture
//!
//! - **Session store**: typed per-session key/value state that outlives any
//!   single pass and is dropped when the session ends
//! - **Rerun host**: runs an app's callback for each user action, then
//!   re-renders the whole app from the session store; a pass can ask to be
//!   re-run after a delay, which is how the countdown ticks
//! - **Apps**: pure date arithmetic, list bookkeeping, a deadline state
//!   machine, and one outbound chat-completions call
//! - **Storage**: TOML defaults only; session data is never persisted
//!
//! ## Key Components
//!
//! - [`Host`]: session registry and pass driver
//! - [`SessionStore`]: keyed state of one session
//! - [`Config`]: configurable defaults

pub mod clock;
pub mod dday;
pub mod error;
pub mod events;
pub mod host;
pub mod prompt;
pub mod session;
pub mod storage;
pub mod timer;

pub use clock::{Clock, ManualClock, SystemClock};
pub use dday::{CalculatorApp, CountMode, DdayList, DdayOutcome, ItemStatus, ListApp};
pub use error::{ConfigError, CoreError, HostError, PromptError, ValidationError};
pub use events::Event;
pub use host::{App, Frame, Host, PassContext, Rendered, Rerun};
pub use prompt::{OpenAiClient, PromptApp, PromptGenerator, PromptRequest};
pub use session::{Key, SessionId, SessionStore, Sessions};
pub use storage::Config;
pub use timer::{CountdownTimer, TimerApp, TimerPhase};
