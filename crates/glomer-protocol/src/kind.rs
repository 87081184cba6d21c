//! The closed set of message type tags.

use strum::{Display, EnumIter, EnumString, IntoStaticStr};

/// Discriminator carried in `body.type` on the wire.
///
/// The set is closed: adding a message type means extending this enum, the
/// [`Payload`](crate::Payload) union, and every exhaustive `match` over them.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, EnumIter, IntoStaticStr,
)]
#[strum(serialize_all = "snake_case")]
pub enum MessageKind {
    /// Handshake assigning the node its identity.
    Init,
    /// Acknowledgement of [`MessageKind::Init`].
    InitOk,
    /// Request to echo a string back.
    Echo,
    /// Reply carrying the echoed string.
    EchoOk,
    /// Request for a cluster-wide unique identifier.
    Generate,
    /// Reply carrying a freshly generated identifier.
    GenerateOk,
    /// Failure reply carrying a numeric error code.
    Error,
}

impl MessageKind {
    /// Returns the wire tag.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        self.into()
    }

    /// Returns the kind a node answers this kind with.
    ///
    /// Replies answer with their own kind.
    #[must_use]
    pub const fn reply_kind(self) -> Self {
        match self {
            Self::Init => Self::InitOk,
            Self::Echo => Self::EchoOk,
            Self::Generate => Self::GenerateOk,
            Self::InitOk | Self::EchoOk | Self::GenerateOk | Self::Error => self,
        }
    }

    /// Returns `true` for kinds that already answer another message.
    #[must_use]
    pub const fn is_reply(self) -> bool {
        match self {
            Self::InitOk | Self::EchoOk | Self::GenerateOk | Self::Error => true,
            Self::Init | Self::Echo | Self::Generate => false,
        }
    }

    /// Returns `false` for `init_ok`, the only kind sent without `msg_id`.
    #[must_use]
    pub const fn carries_msg_id(self) -> bool {
        match self {
            Self::InitOk => false,
            Self::Init
            | Self::Echo
            | Self::EchoOk
            | Self::Generate
            | Self::GenerateOk
            | Self::Error => true,
        }
    }
}
