//! Field accessor generation
//!
//! Supported fields are singular scalars, strings, bytes and submessages of
//! types generated in the same unit. Each one gets:
//!
//! | Context | Accessors |
//! |---------|-----------|
//! | view | `x()` |
//! | cursor | `x()`, `x_mut()`, `clear_x()` |
//! | owner | `x()`, forwarding to the view |
//!
//! Anything else is skipped with a diagnostic and the rest of the message is
//! generated as usual.

use crate::context::Context;
use crate::error::CodegenResult;
use crate::naming::{EntryPoint, ThunkOp, rs_ident};
use crate::schema::{FieldKind, FieldSchema, MessageInfo, Repetition, ScalarType};
use std::collections::BTreeSet;

/// Inherent method names of the generated message types
pub(crate) const RESERVED_METHODS: &[&str] = &[
    "new",
    "serialize",
    "deserialize",
    "as_view",
    "as_mut",
    "into_view",
    "from_ref",
    "__unstable_wrap_raw_message",
    "__unstable_raw_message",
];

/// Claim accessor method names for one schema item. Returns the first name
/// already taken, leaving `taken` unchanged in that case.
pub(crate) fn claim_methods(taken: &mut BTreeSet<String>, names: &[String]) -> Result<(), String> {
    if let Some(clash) = names.iter().find(|n| taken.contains(n.as_str())) {
        return Err(clash.clone());
    }
    taken.extend(names.iter().cloned());
    Ok(())
}

/// How a supported field is read and written
#[derive(Debug, Clone)]
pub enum FieldAccess {
    Scalar {
        ty: ScalarType,
        set: String,
    },
    Text {
        bytes: bool,
        set: String,
    },
    Message {
        /// Path of the target from the crate root, e.g. `Outer_::Inner`
        rust_path: String,
        /// Qualified native class of the target
        cc_name: String,
        get_mut: String,
    },
}

/// A supported field with its thunk names
#[derive(Debug, Clone)]
pub struct FieldPlan<'s> {
    pub field: &'s FieldSchema,
    pub access: FieldAccess,
    pub get: String,
    pub clear: String,
}

/// Rendered accessors of one field, per context
#[derive(Debug, Default)]
pub struct FieldCode {
    pub view: String,
    pub mutator: String,
    pub owner: String,
    pub externs: String,
}

/// Decide whether `field` is generated, and name its thunks.
///
/// Returns `None`, after recording a diagnostic, for unsupported fields.
pub fn plan_field<'s>(
    ctx: &Context<'_>,
    info: &MessageInfo<'_>,
    field: &'s FieldSchema,
    taken: &mut BTreeSet<String>,
) -> CodegenResult<Option<FieldPlan<'s>>> {
    let subject = format!("{}.{}", info.full_name, field.name);

    let kind = match classify(ctx, field) {
        Ok(kind) => kind,
        Err(reason) => {
            ctx.skip(&subject, &reason);
            return Ok(None);
        }
    };

    let names = [
        field.name.clone(),
        format!("{}_mut", field.name),
        format!("clear_{}", field.name),
    ];
    if let Err(clash) = claim_methods(taken, &names) {
        ctx.skip(
            &subject,
            &format!("accessor `{clash}` clashes with another generated method"),
        );
        return Ok(None);
    }

    let full = info.full_name.as_str();
    let name = field.name.as_str();
    let get = ctx.thunk(EntryPoint::member(full, name, ThunkOp::Get))?;

    let access = match kind {
        SupportedKind::Scalar(ty) => FieldAccess::Scalar {
            ty,
            set: ctx.thunk(EntryPoint::member(full, name, ThunkOp::Set))?,
        },
        SupportedKind::Text { bytes } => FieldAccess::Text {
            bytes,
            set: ctx.thunk(EntryPoint::member(full, name, ThunkOp::Set))?,
        },
        SupportedKind::Message(target) => FieldAccess::Message {
            rust_path: target.rust_path.clone(),
            cc_name: target.cc_name.clone(),
            get_mut: ctx.thunk(EntryPoint::member(full, name, ThunkOp::GetMut))?,
        },
    };

    let clear = ctx.thunk(EntryPoint::member(full, name, ThunkOp::Clear))?;

    Ok(Some(FieldPlan {
        field,
        access,
        get,
        clear,
    }))
}

enum SupportedKind<'t> {
    Scalar(ScalarType),
    Text { bytes: bool },
    Message(&'t MessageInfo<'t>),
}

/// Supported shape of `field`, or why it is skipped
fn classify<'t>(ctx: &Context<'t>, field: &FieldSchema) -> Result<SupportedKind<'t>, String> {
    if field.repetition == Repetition::Repeated {
        return Err("repeated fields are not supported".to_string());
    }
    if field.alternate_storage {
        return Err("alternate string storage is not supported".to_string());
    }
    match &field.kind {
        FieldKind::Enum(_) => Err("enum fields are not supported".to_string()),
        FieldKind::Group => Err("group fields are not supported".to_string()),
        FieldKind::String => Ok(SupportedKind::Text { bytes: false }),
        FieldKind::Bytes => Ok(SupportedKind::Text { bytes: true }),
        FieldKind::Message(target) => match ctx.table.get(target) {
            None => Err(format!("message type `{target}` is not generated in this unit")),
            Some(info) if info.is_skipped_map_entry() => {
                Err("map fields are not supported".to_string())
            }
            Some(info) => Ok(SupportedKind::Message(info)),
        },
        kind => kind
            .scalar()
            .map(SupportedKind::Scalar)
            .ok_or_else(|| format!("{kind} fields are not supported")),
    }
}

/// `vars` followed by `extra`
fn with<'v>(vars: &[(&'v str, &'v str)], extra: &[(&'v str, &'v str)]) -> Vec<(&'v str, &'v str)> {
    let mut all = vars.to_vec();
    all.extend_from_slice(extra);
    all
}

/// `// optional int32 count = 1`
fn field_info_comment(field: &FieldSchema) -> String {
    let label = match field.repetition {
        Repetition::Singular => "optional",
        Repetition::Repeated => "repeated",
    };
    format!("// {label} {} {} = {}", field.kind, field.name, field.number)
}

/// Render the accessors and foreign declarations of a planned field
pub fn emit_field(ctx: &Context<'_>, plan: &FieldPlan<'_>) -> CodegenResult<FieldCode> {
    let name = plan.field.name.as_str();
    let field = rs_ident(name);
    let field_mut = rs_ident(&format!("{name}_mut"));
    let clear_fn = rs_ident(&format!("clear_{name}"));
    let comment = field_info_comment(plan.field);

    let mut vars: Vec<(&str, &str)> = vec![
        ("comment", comment.as_str()),
        ("field", field.as_str()),
        ("field_mut", field_mut.as_str()),
        ("clear_fn", clear_fn.as_str()),
        ("getter_thunk", plan.get.as_str()),
        ("clear_thunk", plan.clear.as_str()),
    ];

    match &plan.access {
        FieldAccess::Scalar { ty, set } => {
            let ty = ty.rs_type();
            vars.extend([("ty", ty), ("setter_thunk", set.as_str())]);
            emit_scalar(ctx, &vars)
        }
        FieldAccess::Text { bytes, set } => {
            let (view_ty, mut_ty) = if *bytes {
                ("[u8]".to_string(), "BytesMut")
            } else {
                (format!("{}::ProtoStr", ctx.opts.runtime_crate), "ProtoStrMut")
            };
            vars.extend([
                ("view_ty", view_ty.as_str()),
                ("mut_ty", mut_ty),
                ("setter_thunk", set.as_str()),
            ]);
            emit_text(ctx, *bytes, &vars)
        }
        FieldAccess::Message {
            rust_path, get_mut, ..
        } => {
            let sub_view = ctx.type_path(&format!("{rust_path}View"));
            let sub_mut = ctx.type_path(&format!("{rust_path}Mut"));
            vars.extend([
                ("SubView", sub_view.as_str()),
                ("SubMut", sub_mut.as_str()),
                ("getter_mut_thunk", get_mut.as_str()),
            ]);
            emit_message(ctx, &vars)
        }
    }
}

fn emit_scalar(ctx: &Context<'_>, vars: &[(&str, &str)]) -> CodegenResult<FieldCode> {
    let view = ctx.render(
        r#"
            $comment$
            pub fn $field$(self) -> $ty$ {
                unsafe { $getter_thunk$(self.msg) }
            }
        "#,
        vars,
    )?;

    let mutator = ctx.render(
        r#"
            $comment$
            pub fn $field$(&self) -> $ty$ {
                unsafe { $getter_thunk$(self.inner.msg()) }
            }

            pub fn $field_mut$(&mut self) -> $pb$::PrimitiveMut<'_, $ty$> {
                static VTABLE: $pbi$::PrimitiveVTable<$ty$> =
                    $pbi$::PrimitiveVTable::new($pbi$::Private, $getter_thunk$, $setter_thunk$);
                $pb$::PrimitiveMut::from_inner($pbi$::Private, unsafe {
                    $pbi$::RawVTableMutator::new(
                        $pbi$::Private,
                        self.inner.msg(),
                        self.inner.arena($pbi$::Private),
                        &VTABLE,
                    )
                })
            }

            pub fn $clear_fn$(&mut self) {
                unsafe { $clear_thunk$(self.inner.msg()) }
            }
        "#,
        vars,
    )?;

    let owner = ctx.render(
        r#"
            pub fn $field$(&self) -> $ty$ {
                self.as_view().$field$()
            }
        "#,
        vars,
    )?;

    let externs = ctx.render(
        r#"
            fn $getter_thunk$(raw_msg: $pbi$::RawMessage) -> $ty$;
            fn $setter_thunk$(raw_msg: $pbi$::RawMessage, val: $ty$);
            fn $clear_thunk$(raw_msg: $pbi$::RawMessage);
        "#,
        vars,
    )?;

    Ok(FieldCode {
        view,
        mutator,
        owner,
        externs,
    })
}

fn emit_text(ctx: &Context<'_>, bytes: bool, vars: &[(&str, &str)]) -> CodegenResult<FieldCode> {
    let wrap = if bytes {
        "unsafe { $getter_thunk$($self$).as_ref() }"
    } else {
        "$pb$::ProtoStr::from_bytes(unsafe { $getter_thunk$($self$).as_ref() })"
    };

    let view_read = ctx.render(wrap, &with(vars, &[("self", "self.msg")]))?;
    let mut_read = ctx.render(wrap, &with(vars, &[("self", "self.inner.msg()")]))?;

    let view = ctx.render(
        r#"
            $comment$
            pub fn $field$(self) -> &'msg $view_ty$ {
                $read$
            }
        "#,
        &with(vars, &[("read", view_read.as_str())]),
    )?;

    let mutator = ctx.render(
        r#"
            $comment$
            pub fn $field$(&self) -> &$view_ty$ {
                $read$
            }

            pub fn $field_mut$(&mut self) -> $pb$::$mut_ty$<'_> {
                static VTABLE: $pbi$::BytesMutVTable =
                    $pbi$::BytesMutVTable::new($pbi$::Private, $getter_thunk$, $setter_thunk$);
                $pb$::$mut_ty$::from_inner($pbi$::Private, unsafe {
                    $pbi$::RawVTableMutator::new(
                        $pbi$::Private,
                        self.inner.msg(),
                        self.inner.arena($pbi$::Private),
                        &VTABLE,
                    )
                })
            }

            pub fn $clear_fn$(&mut self) {
                unsafe { $clear_thunk$(self.inner.msg()) }
            }
        "#,
        &with(vars, &[("read", mut_read.as_str())]),
    )?;

    let owner = ctx.render(
        r#"
            pub fn $field$(&self) -> &$view_ty$ {
                self.as_view().$field$()
            }
        "#,
        vars,
    )?;

    let externs = ctx.render(
        r#"
            fn $getter_thunk$(raw_msg: $pbi$::RawMessage) -> $pbi$::PtrAndLen;
            fn $setter_thunk$(raw_msg: $pbi$::RawMessage, val: $pbi$::PtrAndLen);
            fn $clear_thunk$(raw_msg: $pbi$::RawMessage);
        "#,
        vars,
    )?;

    Ok(FieldCode {
        view,
        mutator,
        owner,
        externs,
    })
}

fn emit_message(ctx: &Context<'_>, vars: &[(&str, &str)]) -> CodegenResult<FieldCode> {
    let strategy = ctx.strategy;
    let view_body = ctx.render(
        strategy.submessage_view_body(),
        &with(vars, &[("self", "self.msg")]),
    )?;
    let mut_read_body = ctx.render(
        strategy.submessage_view_body(),
        &with(vars, &[("self", "self.inner.msg()")]),
    )?;
    let mut_body = ctx.render(strategy.submessage_mut_body(), vars)?;

    let view = ctx.render(
        r#"
            $comment$
            pub fn $field$(self) -> $SubView$<'msg> {
                $body$
            }
        "#,
        &with(vars, &[("body", view_body.as_str())]),
    )?;

    let mutator = ctx.render(
        r#"
            $comment$
            pub fn $field$(&self) -> $SubView$<'_> {
                $read_body$
            }

            pub fn $field_mut$(&mut self) -> $SubMut$<'_> {
                $mut_body$
            }

            pub fn $clear_fn$(&mut self) {
                unsafe { $clear_thunk$(self.inner.msg()) }
            }
        "#,
        &with(
            vars,
            &[
                ("read_body", mut_read_body.as_str()),
                ("mut_body", mut_body.as_str()),
            ],
        ),
    )?;

    let owner = ctx.render(
        r#"
            pub fn $field$(&self) -> $SubView$<'_> {
                self.as_view().$field$()
            }
        "#,
        vars,
    )?;

    let externs = ctx.render(strategy.submessage_externs(), vars)?;

    Ok(FieldCode {
        view,
        mutator,
        owner,
        externs,
    })
}
