use std::error::Error;
use std::fmt;
use std::sync::Mutex;

pub const KEYRING_SERVICE: &str = "chatbuddy";
const SESSION_ACCOUNT: &str = "session";

/// Describes failures when attempting to access the system keyring.
///
/// Recoverable errors indicate that the credential backend was
/// temporarily unavailable (for example when the keychain service is
/// locked or inaccessible). Permanent errors surface the underlying
/// cause directly so callers can report them to the user.
#[derive(Debug)]
pub enum KeyringAccessError {
    Recoverable(keyring::Error),
    Permanent(keyring::Error),
}

impl KeyringAccessError {
    fn inner(&self) -> &keyring::Error {
        match self {
            KeyringAccessError::Recoverable(err) | KeyringAccessError::Permanent(err) => err,
        }
    }

    pub fn is_recoverable(&self) -> bool {
        matches!(self, KeyringAccessError::Recoverable(_))
    }
}

impl From<keyring::Error> for KeyringAccessError {
    fn from(err: keyring::Error) -> Self {
        match err {
            keyring::Error::PlatformFailure(_) | keyring::Error::NoStorageAccess(_) => {
                KeyringAccessError::Recoverable(err)
            }
            other => KeyringAccessError::Permanent(other),
        }
    }
}

impl fmt::Display for KeyringAccessError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.inner())
    }
}

impl Error for KeyringAccessError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        Some(self.inner())
    }
}

/// Where the serialized login session lives between runs.
pub trait SessionStore: Send + Sync {
    fn load(&self) -> Result<Option<String>, KeyringAccessError>;
    fn save(&self, payload: &str) -> Result<(), KeyringAccessError>;
    fn clear(&self) -> Result<(), KeyringAccessError>;
}

/// Session storage backed by the platform credential store.
pub struct KeyringSessionStore {
    service: String,
}

impl KeyringSessionStore {
    pub fn new() -> Self {
        Self::with_service(KEYRING_SERVICE)
    }

    pub fn with_service(service: impl Into<String>) -> Self {
        Self {
            service: service.into(),
        }
    }

    fn entry(&self) -> Result<keyring::Entry, KeyringAccessError> {
        Ok(keyring::Entry::new(&self.service, SESSION_ACCOUNT)?)
    }
}

impl Default for KeyringSessionStore {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionStore for KeyringSessionStore {
    fn load(&self) -> Result<Option<String>, KeyringAccessError> {
        match self.entry()?.get_password() {
            Ok(payload) => Ok(Some(payload)),
            Err(keyring::Error::NoEntry) => Ok(None),
            Err(err) => Err(err.into()),
        }
    }

    fn save(&self, payload: &str) -> Result<(), KeyringAccessError> {
        self.entry()?.set_password(payload)?;
        Ok(())
    }

    fn clear(&self) -> Result<(), KeyringAccessError> {
        match self.entry()?.delete_credential() {
            Ok(()) | Err(keyring::Error::NoEntry) => Ok(()),
            Err(err) => Err(err.into()),
        }
    }
}

/// Process-local store used by tests and when the keyring is unavailable.
#[derive(Default)]
pub struct MemorySessionStore {
    payload: Mutex<Option<String>>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_payload(payload: impl Into<String>) -> Self {
        Self {
            payload: Mutex::new(Some(payload.into())),
        }
    }

    pub fn snapshot(&self) -> Option<String> {
        self.payload
            .lock()
            .map(|guard| guard.clone())
            .unwrap_or_default()
    }
}

impl SessionStore for MemorySessionStore {
    fn load(&self) -> Result<Option<String>, KeyringAccessError> {
        Ok(self.snapshot())
    }

    fn save(&self, payload: &str) -> Result<(), KeyringAccessError> {
        if let Ok(mut guard) = self.payload.lock() {
            *guard = Some(payload.to_string());
        }
        Ok(())
    }

    fn clear(&self) -> Result<(), KeyringAccessError> {
        if let Ok(mut guard) = self.payload.lock() {
            *guard = None;
        }
        Ok(())
    }
}
