//! Associates an owning message type with its borrowed view and cursor types

/// A type whose borrowed forms are proxies rather than plain references.
///
/// Every generated message `Msg` implements this with `View<'msg> =
/// MsgView<'msg>` and `Mut<'msg> = MsgMut<'msg>`. Generic code can name the
/// proxies through the [`View`] and [`Mut`] aliases.
pub trait Proxied {
    /// Read-only, copyable proxy
    type View<'msg>: Copy + Send + Sync
    where
        Self: 'msg;

    /// Exclusive mutable proxy
    type Mut<'msg>
    where
        Self: 'msg;
}

/// Shorthand for the view proxy of `T`.
pub type View<'msg, T> = <T as Proxied>::View<'msg>;

/// Shorthand for the mutable proxy of `T`.
pub type Mut<'msg, T> = <T as Proxied>::Mut<'msg>;
