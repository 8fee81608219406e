//! Item definitions. Everything that can sit in an inventory slot, a
//! chest, or a keepsake bundle is defined here.

use crate::shared::{ItemDef, ItemRegistry};

fn def(id: &str, name: &str, sell_price: u32, max_stack: u8) -> ItemDef {
    ItemDef {
        id: id.to_string(),
        name: name.to_string(),
        sell_price,
        max_stack,
    }
}

pub fn populate_items(registry: &mut ItemRegistry) {
    let defs = [
        def("chest", "Storage Chest", 0, 99),
        def("parsnip", "Parsnip", 35, 99),
        def("potato", "Potato", 80, 99),
        def("pumpkin", "Pumpkin", 320, 99),
        def("fiber", "Fiber", 1, 99),
        def("wood", "Wood", 2, 99),
        def("stone", "Stone", 2, 99),
        def("honey", "Wild Honey", 100, 99),
        def("wool", "Wool", 340, 99),
        def("berry_pie", "Berry Pie", 150, 10),
        def("old_letter", "Weathered Letter", 0, 1),
    ];

    for item in defs {
        registry.items.insert(item.id.clone(), item);
    }
}
