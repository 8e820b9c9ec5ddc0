use model::entities::prelude::*;
use sea_orm::entity::prelude::*;
use sea_orm::Iden;

/// Lets migrations name tables and columns through the entities instead of
/// repeating string literals, so a renamed column fails to compile here.
pub trait EntityIden: EntityTrait {
    fn table() -> NameIden {
        NameIden(Self::default().table_name().to_string())
    }

    fn column<C: ColumnTrait + Iden>(column: C) -> NameIden {
        let mut name = String::new();
        column.unquoted(&mut name);
        NameIden(name)
    }
}

impl EntityIden for User {}
impl EntityIden for OneOffTransaction {}
impl EntityIden for RecurringTransaction {}

/// An owned table or column name.
#[derive(Debug, Clone)]
pub struct NameIden(String);

impl Iden for NameIden {
    fn unquoted(&self, s: &mut dyn std::fmt::Write) {
        let _ = s.write_str(&self.0);
    }
}
