use super::{BuildSchema, ChildDef, ContentDef, LinkDef, OrderDef, PropertyDef};
use crate::{
    schema::{
        db::TableId,
        xml::{
            ChildMap, ClassMapKind, Content, InlineClassMap, PropertyKind, PropertyMap,
            PropertyTable, RelatedClassMap,
        },
        LinkInfo, OrderInfo, XmlName,
    },
    Error, Result,
};

impl BuildSchema<'_> {
    /// Resolves the content of an element mapped into `table`. `owner` is the
    /// element whose text a PCDATA map captures.
    pub(super) fn build_content(
        &self,
        def: &ContentDef,
        table: TableId,
        owner: &XmlName,
    ) -> Result<Content> {
        let mut content = Content::default();

        for (name, property) in &def.attributes {
            let map = self
                .build_property(name, PropertyKind::Attribute, property, table)
                .map_err(|err| err.context(format!("attribute `{name}`")))?;
            content.attributes.insert(name.clone(), map);
        }

        if let Some(property) = &def.pcdata {
            let map = self
                .build_property(owner, PropertyKind::Pcdata, property, table)
                .map_err(|err| err.context("PCDATA"))?;
            content.pcdata = Some(map);
        }

        for child in &def.children {
            let element = child.element();

            if content.children.contains_key(element) {
                return Err(Error::invalid_mapping(format!(
                    "child element `{element}` is mapped more than once"
                )));
            }

            let map = self
                .build_child(child, table)
                .map_err(|err| err.context(format!("child element `{element}`")))?;
            content.children.insert(element.clone(), map);
        }

        Ok(content)
    }

    fn build_child(&self, def: &ChildDef, table: TableId) -> Result<ChildMap> {
        Ok(match def {
            ChildDef::Property(def) => ChildMap::Property(self.build_property(
                &def.element,
                PropertyKind::Element,
                &def.property,
                table,
            )?),
            ChildDef::RelatedClass(def) => {
                let class = self.resolve_element(&def.element).ok_or_else(|| {
                    Error::invalid_mapping(format!("element type `{}` is not mapped", def.element))
                })?;

                let class_def = &self.builder.classes[class.0];

                if !matches!(
                    class_def.kind,
                    ClassMapKind::RootTable | ClassMapKind::ClassTable
                ) {
                    return Err(Error::invalid_mapping(format!(
                        "related class `{}` is a {:?} class map",
                        class_def.element, class_def.kind
                    )));
                }

                let related_table = self.class_tables[class.0].ok_or_else(|| {
                    Error::invalid_mapping(format!(
                        "class map `{}` has no table",
                        class_def.element
                    ))
                })?;
                let link = self.build_link(&def.link, table, related_table)?;
                let order =
                    self.build_order(def.order.as_ref(), fk_table(&link, table, related_table))?;

                ChildMap::RelatedClass(RelatedClassMap {
                    element: def.element.clone(),
                    class,
                    link,
                    order,
                })
            }
            ChildDef::InlineClass(def) => ChildMap::InlineClass(InlineClassMap {
                element: def.element.clone(),
                content: self.build_content(&def.content, table, &def.element)?,
                order: self.build_order(def.order.as_ref(), table)?,
            }),
        })
    }

    fn build_property(
        &self,
        name: &XmlName,
        kind: PropertyKind,
        def: &PropertyDef,
        class_table: TableId,
    ) -> Result<PropertyMap> {
        if def.multi_valued && kind != PropertyKind::Attribute {
            return Err(Error::invalid_mapping("only attributes can be multi-valued"));
        }

        match &def.property_table {
            Some(property_table) => {
                let table = self.table_id(&property_table.table)?;
                let link = self.build_link(&property_table.link, class_table, table)?;

                if def.multi_valued && !link.parent_key_is_unique() {
                    return Err(Error::invalid_mapping(
                        "a multi-valued property table must hold the foreign key",
                    ));
                }

                Ok(PropertyMap {
                    name: name.clone(),
                    kind,
                    column: self.column(table, &def.column)?,
                    property_table: Some(PropertyTable { table, link }),
                    order: self.build_order(
                        def.order.as_ref(),
                        fk_table(&link, class_table, table),
                    )?,
                    multi_valued: def.multi_valued,
                })
            }
            None => {
                if def.multi_valued {
                    return Err(Error::invalid_mapping(
                        "multi-valued attributes must be stored in a property table",
                    ));
                }

                Ok(PropertyMap {
                    name: name.clone(),
                    kind,
                    column: self.column(class_table, &def.column)?,
                    property_table: None,
                    order: self.build_order(def.order.as_ref(), class_table)?,
                    multi_valued: false,
                })
            }
        }
    }

    fn build_link(&self, def: &LinkDef, parent: TableId, child: TableId) -> Result<LinkInfo> {
        let parent_key = self.key(parent, &def.parent_key)?;
        let child_key = self.key(child, &def.child_key)?;
        LinkInfo::new(parent_key, child_key)
    }

    fn build_order(&self, def: Option<&OrderDef>, table: TableId) -> Result<Option<OrderInfo>> {
        Ok(match def {
            None => None,
            Some(OrderDef::Fixed(value)) => Some(OrderInfo::Fixed(*value)),
            Some(OrderDef::Column {
                name,
                ascending,
                generate,
            }) => Some(OrderInfo::Column {
                column: self.column(table, name)?,
                ascending: *ascending,
                generate: *generate,
            }),
        })
    }
}

/// The table holding the foreign key of a link, where its order column lives.
fn fk_table(link: &LinkInfo, parent: TableId, child: TableId) -> TableId {
    if link.parent_key_is_unique() {
        child
    } else {
        parent
    }
}
