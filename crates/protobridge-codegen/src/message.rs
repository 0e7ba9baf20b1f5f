//! Message wrapper generation
//!
//! For a message `Msg` the generator emits:
//!
//! - `Msg`, the owning handle, with `new`, `serialize`, `deserialize`,
//!   `as_view`, `as_mut` and read forwarders for every accessor
//! - `MsgView<'msg>`, a copyable read-only view
//! - `MsgMut<'msg>`, an exclusive cursor
//! - the `Proxied` impl tying the three together, `Default` and `Drop`
//! - one `unsafe extern "C"` block declaring every thunk the message uses
//! - a `Msg_` module holding nested messages and oneof case enums, when
//!   there are any
//!
//! Generation happens in two passes. Planning decides what is supported,
//! records diagnostics and hands out thunk names; emission renders text from
//! the plan. The native thunk emitter reads the same plan, so both sides of
//! the boundary see the same names.

use crate::accessors::{FieldCode, FieldPlan, RESERVED_METHODS, emit_field, plan_field};
use crate::context::Context;
use crate::error::{CodegenError, CodegenResult};
use crate::naming::{EntryPoint, ThunkOp};
use crate::oneof::{OneofCode, OneofPlan, emit_oneof, plan_oneof};
use crate::schema::MessageInfo;
use std::collections::BTreeSet;

/// Everything generated for one message, nested messages included
#[derive(Debug)]
pub struct MessagePlan<'s> {
    pub info: &'s MessageInfo<'s>,
    /// Message-level thunks in the backend's order
    pub thunks: Vec<(ThunkOp, String)>,
    pub fields: Vec<FieldPlan<'s>>,
    pub oneofs: Vec<OneofPlan<'s>>,
    pub nested: Vec<MessagePlan<'s>>,
}

impl MessagePlan<'_> {
    /// Symbol of the message-level thunk for `op`, if the backend has one
    pub fn thunk(&self, op: ThunkOp) -> Option<&str> {
        self.thunks
            .iter()
            .find(|(o, _)| *o == op)
            .map(|(_, name)| name.as_str())
    }

    /// Whether a `Msg_` module is emitted for nested items
    pub fn has_module(&self) -> bool {
        !self.nested.is_empty() || !self.oneofs.is_empty()
    }
}

/// Reserve the type names generated for a planned message in one module:
/// `Msg`, `MsgView`, `MsgMut`, and `Msg_` when it has nested items.
pub(crate) fn claim_type_names(
    items: &mut BTreeSet<String>,
    scope: &str,
    plan: &MessagePlan<'_>,
) -> CodegenResult<()> {
    let name = plan.info.name();
    let mut generated = vec![name.to_string(), format!("{name}View"), format!("{name}Mut")];
    if plan.has_module() {
        generated.push(format!("{name}_"));
    }
    for item in generated {
        if !items.insert(item.clone()) {
            return Err(CodegenError::InvalidSchema(format!(
                "generated type `{item}` for message `{name}` clashes with another item of {scope}"
            )));
        }
    }
    Ok(())
}

/// Plan `info` and its nested messages.
///
/// Map entry messages return `None` after recording a diagnostic.
pub fn plan_message<'s>(
    ctx: &Context<'s>,
    info: &'s MessageInfo<'s>,
) -> CodegenResult<Option<MessagePlan<'s>>> {
    if info.is_map_entry() {
        ctx.skip(&info.full_name, "map fields are not supported");
        return Ok(None);
    }

    let mut thunks = Vec::new();
    for &op in ctx.strategy.message_ops() {
        thunks.push((op, ctx.thunk(EntryPoint::message(&info.full_name, op))?));
    }

    let mut taken: BTreeSet<String> = RESERVED_METHODS.iter().map(|m| m.to_string()).collect();

    let mut fields = Vec::new();
    for field in &info.schema.fields {
        if let Some(plan) = plan_field(ctx, info, field, &mut taken)? {
            fields.push(plan);
        }
    }

    let scope = format!("`{}_`", info.name());
    let mut module_items = BTreeSet::new();
    let mut nested = Vec::new();
    for child_name in &info.nested {
        let Some(child) = ctx.table.get(child_name) else {
            continue;
        };
        if let Some(plan) = plan_message(ctx, child)? {
            claim_type_names(&mut module_items, &scope, &plan)?;
            nested.push(plan);
        }
    }

    let mut oneofs = Vec::new();
    for oneof in &info.schema.oneofs {
        if let Some(plan) = plan_oneof(ctx, info, oneof, &mut taken, &mut module_items)? {
            oneofs.push(plan);
        }
    }

    Ok(Some(MessagePlan {
        info,
        thunks,
        fields,
        oneofs,
        nested,
    }))
}

/// Render the Rust code of a planned message and its nested messages
pub fn emit_message(ctx: &Context<'_>, plan: &MessagePlan<'_>) -> CodegenResult<String> {
    let info = plan.info;
    tracing::debug!(
        message = %info.full_name,
        fields = plan.fields.len(),
        oneofs = plan.oneofs.len(),
        nested = plan.nested.len(),
        "emitting message"
    );

    let fields: Vec<FieldCode> = plan
        .fields
        .iter()
        .map(|f| emit_field(ctx, f))
        .collect::<CodegenResult<_>>()?;
    let oneofs: Vec<OneofCode> = plan
        .oneofs
        .iter()
        .map(|o| emit_oneof(ctx, info, o))
        .collect::<CodegenResult<_>>()?;

    let view_accessors = join_code(
        fields
            .iter()
            .map(|f| &f.view)
            .chain(oneofs.iter().map(|o| &o.view)),
    );
    let mut_accessors = join_code(
        fields
            .iter()
            .map(|f| &f.mutator)
            .chain(oneofs.iter().map(|o| &o.mutator)),
    );
    let owner_accessors = join_code(
        fields
            .iter()
            .map(|f| &f.owner)
            .chain(oneofs.iter().map(|o| &o.owner)),
    );

    let thunk_vars: Vec<(String, &str)> = plan
        .thunks
        .iter()
        .map(|(op, name)| (format!("{}_thunk", op.as_str()), name.as_str()))
        .collect();
    let thunk_vars: Vec<(&str, &str)> = thunk_vars
        .iter()
        .map(|(var, name)| (var.as_str(), *name))
        .collect();

    let strategy = ctx.strategy;
    let new_body = ctx.render(strategy.new_body(), &thunk_vars)?;
    let serialize_body = ctx.render(strategy.serialize_body(), &thunk_vars)?;
    let deserialize_body = ctx.render(strategy.deserialize_body(), &thunk_vars)?;
    let drop_body = ctx.render(strategy.drop_body(), &thunk_vars)?;
    let raw_access = match strategy.raw_access() {
        Some(template) => ctx.render(template, &thunk_vars)?,
        None => String::new(),
    };

    let mut externs = ctx.render(strategy.message_externs(), &thunk_vars)?;
    for code in fields.iter().map(|f| &f.externs).chain(oneofs.iter().map(|o| &o.externs)) {
        externs.push_str(code);
    }

    let module = emit_module(ctx, plan, &oneofs)?;

    ctx.render(
        r#"
            #[allow(non_camel_case_types)]
            #[derive(Debug)]
            pub struct $Msg$ {
                inner: $pbr$::MessageInner,
            }

            // SAFETY:
            // - `$Msg$` exclusively owns its native message.
            // - Shared references only reach read thunks; writes need `&mut self`.
            unsafe impl Sync for $Msg$ {}

            // SAFETY: the native message has no affinity to the creating thread.
            unsafe impl Send for $Msg$ {}

            impl $pb$::Proxied for $Msg$ {
                type View<'msg> = $Msg$View<'msg>;
                type Mut<'msg> = $Msg$Mut<'msg>;
            }

            #[allow(non_camel_case_types, dead_code)]
            #[derive(Debug, Clone, Copy)]
            pub struct $Msg$View<'msg> {
                msg: $pbi$::RawMessage,
                _phantom: ::std::marker::PhantomData<&'msg ()>,
            }

            impl<'msg> $Msg$View<'msg> {
                #[doc(hidden)]
                pub fn new(_private: $pbi$::Private, msg: $pbi$::RawMessage) -> Self {
                    Self {
                        msg,
                        _phantom: ::std::marker::PhantomData,
                    }
                }

                $view_accessors$
            }

            // SAFETY: a view only reaches read thunks, and the borrow it carries
            // rules out a live cursor on the same message.
            unsafe impl Sync for $Msg$View<'_> {}

            // SAFETY: see `Sync` above.
            unsafe impl Send for $Msg$View<'_> {}

            #[allow(non_camel_case_types)]
            #[derive(Debug)]
            pub struct $Msg$Mut<'msg> {
                inner: $pbr$::MutatorMessageRef<'msg>,
            }

            impl<'msg> $Msg$Mut<'msg> {
                #[doc(hidden)]
                pub fn new(_private: $pbi$::Private, parent: &'msg mut $pbr$::MessageInner) -> Self {
                    Self {
                        inner: $pbr$::MutatorMessageRef::from_parent($pbi$::Private, parent),
                    }
                }

                #[doc(hidden)]
                pub fn from_ref(_private: $pbi$::Private, inner: $pbr$::MutatorMessageRef<'msg>) -> Self {
                    Self { inner }
                }

                pub fn as_view(&self) -> $Msg$View<'_> {
                    $Msg$View::new($pbi$::Private, self.inner.msg())
                }

                pub fn into_view(self) -> $Msg$View<'msg> {
                    $Msg$View::new($pbi$::Private, self.inner.msg())
                }

                pub fn as_mut(&mut self) -> $Msg$Mut<'_> {
                    $Msg$Mut {
                        inner: self.inner.reborrow(),
                    }
                }

                $mut_accessors$
            }

            // SAFETY: shared references to a cursor only reach read thunks.
            unsafe impl Sync for $Msg$Mut<'_> {}

            impl $Msg$ {
                pub fn new() -> Self {
                    $new_body$
                }

                pub fn serialize(&self) -> $pbr$::SerializedData {
                    $serialize_body$
                }

                /// Replace the contents of this message with `data` parsed.
                ///
                /// On failure the message keeps its previous contents.
                pub fn deserialize(&mut self, data: &[u8]) -> ::std::result::Result<(), $pb$::ParseError> {
                    $deserialize_body$
                }

                pub fn as_view(&self) -> $Msg$View<'_> {
                    $Msg$View::new($pbi$::Private, self.inner.msg)
                }

                pub fn as_mut(&mut self) -> $Msg$Mut<'_> {
                    $Msg$Mut::new($pbi$::Private, &mut self.inner)
                }

                $owner_accessors$

                $raw_access$
            }

            impl ::std::default::Default for $Msg$ {
                fn default() -> Self {
                    Self::new()
                }
            }

            impl ::std::ops::Drop for $Msg$ {
                fn drop(&mut self) {
                    $drop_body$
                }
            }

            unsafe extern "C" {
                $externs$
            }

            $module$
        "#,
        &[
            ("Msg", info.name()),
            ("view_accessors", view_accessors.as_str()),
            ("mut_accessors", mut_accessors.as_str()),
            ("owner_accessors", owner_accessors.as_str()),
            ("new_body", new_body.as_str()),
            ("serialize_body", serialize_body.as_str()),
            ("deserialize_body", deserialize_body.as_str()),
            ("drop_body", drop_body.as_str()),
            ("raw_access", raw_access.as_str()),
            ("externs", externs.as_str()),
            ("module", module.as_str()),
        ],
    )
}

/// `Msg_` module with nested messages and case enums, or nothing
fn emit_module(
    ctx: &Context<'_>,
    plan: &MessagePlan<'_>,
    oneofs: &[OneofCode],
) -> CodegenResult<String> {
    let mut items = Vec::new();
    for nested in &plan.nested {
        items.push(emit_message(ctx, nested)?);
    }
    items.extend(oneofs.iter().map(|o| o.case_enum.clone()));
    if items.is_empty() {
        return Ok(String::new());
    }
    let items = join_code(items.iter());

    ctx.render(
        r#"
            #[allow(non_snake_case)]
            pub mod $Msg$_ {
                $items$
            }
        "#,
        &[("Msg", plan.info.name()), ("items", items.as_str())],
    )
}

/// Rendered items separated by one blank line
fn join_code<'a>(parts: impl Iterator<Item = &'a String>) -> String {
    parts.map(String::as_str).collect::<Vec<_>>().join("\n")
}
