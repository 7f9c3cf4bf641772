pub mod session;
pub mod task;

pub mod agent_api {
    use serde::{Deserialize, Serialize};

    #[derive(Debug, Clone, Serialize, Deserialize)]
    pub struct ChatMessage {
        pub role: String, // "system" | "user" | "assistant"
        pub content: String,
    }

    /// One fragment of a streaming chat response.
    ///
    /// Contract: zero or more `Text` fragments arrive in order, then `Done`.
    /// Transport failures after streaming has started arrive as `Error`.
    #[derive(Debug, Clone, Serialize, Deserialize)]
    pub enum StreamChunk {
        Text(String),
        Done { stop_reason: Option<String> },
        Error(String),
    }
}

pub mod identity {
    use parking_lot::RwLock;
    use serde::{Deserialize, Serialize};

    /// An authenticated user.
    #[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
    pub struct Principal {
        pub id: String,
        pub display_name: String,
    }

    /// Identity provider contract. Login flows and token plumbing live
    /// outside the core; callers only need the current principal.
    pub trait IdentityProvider: Send + Sync {
        fn login(&self, principal: Principal);
        fn logout(&self);
        fn current(&self) -> Option<Principal>;
    }

    /// Single-user provider backed by process memory.
    #[derive(Default)]
    pub struct LocalIdentity {
        current: RwLock<Option<Principal>>,
    }

    impl IdentityProvider for LocalIdentity {
        fn login(&self, principal: Principal) {
            *self.current.write() = Some(principal);
        }

        fn logout(&self) {
            *self.current.write() = None;
        }

        fn current(&self) -> Option<Principal> {
            self.current.read().clone()
        }
    }

}
