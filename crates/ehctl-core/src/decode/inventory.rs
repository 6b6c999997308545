// ── `show inventory` ──

use std::sync::LazyLock;

use crate::model::{FieldKind, FieldTable};
use crate::parse::{RecordPattern, TreeNode, assemble, extract_indexed};

static PATTERN: LazyLock<RecordPattern> = LazyLock::new(|| RecordPattern::indexed("inventory"));

/// Parent component id; 0 marks the chassis.
pub const PARENT_FIELD: &str = "cont_in";
/// Position among siblings.
pub const ORDER_FIELD: &str = "rel_pos";

const FIELDS: FieldTable = FieldTable::new(&[
    (PARENT_FIELD, FieldKind::Int),
    (ORDER_FIELD, FieldKind::Int),
    ("fru", FieldKind::Bool),
]);

/// Decode the hardware inventory into a component tree rooted at the
/// chassis. `None` when the output has no root component.
pub fn decode_inventory(text: &str) -> Option<TreeNode> {
    let records = extract_indexed(text, &PATTERN, &FIELDS);
    assemble(&records, PARENT_FIELD, ORDER_FIELD)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::FieldValue;
    use pretty_assertions::assert_eq;

    const SHOW_INVENTORY_8010: &str = "
inventory 1 desc                      : EH-8010FX-AES-H
inventory 1 cont-in                   : 0
inventory 1 class                     : chassis
inventory 1 rel-pos                   : -1
inventory 1 name                      : Chassis
inventory 1 hw-rev                    : D1
inventory 1 fw-rev                    :
inventory 1 sw-rev                    : 10.8.2-19419-f50a23d53d
inventory 1 serial                    : FC18594555
inventory 1 mfg-name                  : Siklu
inventory 1 model-name                : EH-8010FX-ODUH-A-2C1P-EX-D
inventory 1 fru                       : true

inventory 2 desc                      : BB Board
inventory 2 cont-in                   : 1
inventory 2 class                     : container
inventory 2 rel-pos                   : 0
inventory 2 name                      : Base Band
inventory 2 hw-rev                    : 2.0.
inventory 2 fw-rev                    :
inventory 2 sw-rev                    :
inventory 2 serial                    : FC17588055
inventory 2 mfg-name                  : Siklu
inventory 2 model-name                :
inventory 2 fru                       : false

inventory 6 desc                      : Modem Chip
inventory 6 cont-in                   : 2
inventory 6 class                     : container
inventory 6 rel-pos                   : 0
inventory 6 name                      : Modem
inventory 6 fru                       : false

inventory 3 desc                      : Eth Port
inventory 3 cont-in                   : 1
inventory 3 class                     : port
inventory 3 rel-pos                   : 1
inventory 3 name                      : eth1

inventory 14 desc                      : Dual media: SFP (empty)
inventory 14 cont-in                   : 10
inventory 14 class                     : module
inventory 14 rel-pos                   : 0
inventory 14 name                      : Sfp eth2
inventory 14 mfg-name                  : N/A
inventory 14 fru                       : true
";

    #[test]
    fn chassis_carries_typed_fields() {
        let chassis = decode_inventory(SHOW_INVENTORY_8010).unwrap_or_else(|| panic!("no chassis"));
        assert_eq!(chassis.id, 1);
        assert_eq!(chassis.record.str("desc"), Some("EH-8010FX-AES-H"));
        assert_eq!(chassis.record.str("serial"), Some("FC18594555"));
        assert_eq!(chassis.record.int("cont_in"), Some(0));
        assert_eq!(chassis.record.int("rel_pos"), Some(-1));
        assert_eq!(chassis.record.bool("fru"), Some(true));
        assert_eq!(chassis.record.value("fw_rev"), &FieldValue::Absent);
    }

    #[test]
    fn components_nest_in_position_order() {
        let chassis = decode_inventory(SHOW_INVENTORY_8010).unwrap_or_else(|| panic!("no chassis"));
        let children: Vec<u32> = chassis.components.iter().map(|c| c.id).collect();
        assert_eq!(children, vec![2, 3]);

        let bb = &chassis.components[0];
        assert_eq!(bb.record.bool("fru"), Some(false));
        assert_eq!(bb.record.value("sw_rev"), &FieldValue::Absent);
        assert_eq!(bb.components.len(), 1);
        assert_eq!(bb.components[0].record.str("desc"), Some("Modem Chip"));
        assert_eq!(chassis.depth(), 3);
    }

    #[test]
    fn component_with_unknown_parent_is_dropped() {
        let chassis = decode_inventory(SHOW_INVENTORY_8010).unwrap_or_else(|| panic!("no chassis"));
        assert!(chassis.find(14).is_none());
        assert_eq!(chassis.walk().len(), 4);
    }

    #[test]
    fn output_without_chassis_decodes_to_nothing() {
        assert_eq!(decode_inventory(""), None);
        assert_eq!(decode_inventory("inventory 5 cont-in : 4\n"), None);
    }
}
