use indexmap::IndexMap;
use tracing::debug;
use typeval_schema::{Props, SchemaNode};
use typeval_types::{Property, TypeFlags, TypeHost, TypeId};

use crate::history::{History, HistoryKey};
use crate::{CompileError, Compiler, modifier};

impl<H: TypeHost + ?Sized> Compiler<'_, H> {
    /// Merge the properties of every member into one object.
    pub(crate) fn intersection(&self, history: &mut History, ty: TypeId) -> Result<SchemaNode, CompileError> {
        let own = HistoryKey::of(self.host.display_name(ty), ty);
        if history.contains(&own) {
            debug!(ty = %self.host.type_to_string(ty), "cycle cut");
            return Ok(SchemaNode::keyword("any"));
        }

        let outermost = history.is_empty();
        let members = self.host.members(ty);

        let scalar = TypeFlags::STRING_LIKE
            | TypeFlags::NUMBER_LIKE
            | TypeFlags::BOOLEAN_LIKE
            | TypeFlags::LITERAL;
        if let Some(member) = members
            .iter()
            .find(|member| self.host.flags(**member).intersects(scalar))
        {
            return Err(CompileError::InvalidIntersectionMember {
                type_name: self.host.type_to_string(*member),
            });
        }

        let mut declared: IndexMap<&str, Vec<&Property>> = IndexMap::new();
        for member in members {
            for prop in self.host.properties(*member) {
                declared.entry(prop.name.as_str()).or_default().push(prop);
            }
        }

        let keys = [HistoryKey::Anonymous, own].into_iter().chain(
            members
                .iter()
                .filter_map(|member| self.host.display_name(*member))
                .map(|name| HistoryKey::Named(name.to_string())),
        );
        let mut guard = history.enter_many(keys);

        let mut props = Props::new();
        for (name, declarers) in declared {
            let prop_ty = match declarers.as_slice() {
                [single] => single.ty,
                _ => self.host.merged_property_type(ty, name).ok_or_else(|| {
                    CompileError::UnresolvedMergedProperty {
                        property: name.to_string(),
                    }
                })?,
            };
            let mut node = self.convert(&mut guard, prop_ty)?;
            if declarers.iter().all(|declarer| declarer.optional) {
                modifier::set_optional(&mut node);
            }
            for declarer in &declarers {
                modifier::apply_annotations(&mut node, &declarer.annotations);
            }
            props.insert(name.to_string(), node);
        }
        drop(guard);

        Ok(self.object(outermost, props))
    }
}
