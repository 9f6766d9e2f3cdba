use tracing::debug;
use typeval_schema::SchemaNode;
use typeval_types::{TypeFlags, TypeHost, TypeId};

use crate::history::{History, HistoryKey};
use crate::{CompileError, Compiler, modifier};

impl<H: TypeHost + ?Sized> Compiler<'_, H> {
    /// `undefined` and `null` members become `optional` and `nullable`; the
    /// rest compile to a literal, an enum or a list of alternatives.
    pub(crate) fn union(&self, history: &mut History, ty: TypeId) -> Result<SchemaNode, CompileError> {
        let own = self
            .host
            .display_name(ty)
            .map(|name| HistoryKey::Named(name.to_string()));
        if let Some(key) = &own
            && history.contains(key)
        {
            debug!(ty = %self.host.type_to_string(ty), "cycle cut");
            return Ok(SchemaNode::keyword("any"));
        }

        let outermost = history.is_empty();
        let mut optional = false;
        let mut nullable = false;
        let members: Vec<TypeId> = self
            .host
            .members(ty)
            .iter()
            .copied()
            .filter(|member| {
                let flags = self.host.flags(*member);
                if flags.intersects(TypeFlags::UNDEFINED) {
                    optional = true;
                    false
                } else if flags.intersects(TypeFlags::NULL) {
                    nullable = true;
                    false
                } else {
                    true
                }
            })
            .collect();

        let all_literals = members
            .iter()
            .all(|member| self.host.flags(*member).intersects(TypeFlags::LITERAL));

        let mut node = match members.as_slice() {
            [] => SchemaNode::keyword("forbidden"),
            [member] if all_literals => self.literal(*member)?,
            _ if all_literals => self.enumeration(&members)?,
            [member] => {
                let mut guard = history.enter_many(std::iter::once(HistoryKey::Anonymous).chain(own));
                self.convert(&mut guard, *member)?
            }
            _ => {
                let mut guard = history.enter_many(std::iter::once(HistoryKey::Anonymous).chain(own));
                let alternatives = members
                    .iter()
                    .map(|member| self.convert(&mut guard, *member))
                    .collect::<Result<Vec<_>, _>>()?;
                SchemaNode::Alternatives(alternatives)
            }
        };

        if outermost {
            modifier::mark_root(&mut node, &self.options.root_marker);
        }
        if optional {
            modifier::set_optional(&mut node);
        }
        if nullable {
            modifier::set_nullable(&mut node);
        }
        Ok(node)
    }
}
