//! Sprite descriptor data: table bytes, behavior pointers, and the display
//! and collection metadata parsed out of a sprite's configuration files.
//!
//! Pure data. Parsing fills these in; emission and printing read them back
//! out. Nothing here touches the ROM.

use std::fmt::Display;
use std::fmt::Error;
use std::fmt::Formatter;

use crate::addressing::PointerValue;

/// Level number meaning "not tied to any level".
pub const NO_LEVEL: u16 = 0x200;

/// Which sprite list a descriptor was read from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ListType {
    #[default]
    Sprite,
    Extended,
    Cluster,
}

/// How a display entry is addressed: by screen position or by extension
/// byte value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DisplayKind {
    #[default]
    XyPosition,
    ExtensionByte,
}

/// One 8x8 tile reference inside a map16 block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TileRef {
    pub tile: u8,
    pub prop: u8,
}

/// A 16x16 map block: four 8x8 tiles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Map16 {
    pub top_left: TileRef,
    pub bottom_left: TileRef,
    pub top_right: TileRef,
    pub bottom_right: TileRef,
}

/// The per-sprite table row: behavior bytes plus the init/main entry
/// pointers that get installed into the sprite tables.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SpriteTable {
    pub sprite_type: u8,
    pub actlike: u8,
    pub tweak: [u8; 6],
    pub init: PointerValue,
    pub main: PointerValue,
    pub extra: [u8; 2],
}

/// The five optional behavior pointers a custom sprite can override.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct BehaviorPointers {
    pub carriable: PointerValue,
    pub carried: PointerValue,
    pub goal: PointerValue,
    pub kicked: PointerValue,
    pub mouth: PointerValue,
}

/// One tile of a display entry: either a literal tile number or free text.
#[derive(Debug, Clone, Default)]
pub struct DisplayTile {
    pub x_offset: i32,
    pub y_offset: i32,
    pub tile_number: u32,
    /// Non-empty text overrides `tile_number`.
    pub text: String,
}

/// A positioned display entry shown in the editor.
#[derive(Debug, Clone, Default)]
pub struct DisplayEntry {
    pub x_or_index: i32,
    pub y_or_value: i32,
    pub extra_bit: bool,
    pub description: String,
    pub tiles: Vec<DisplayTile>,
}

/// A named collection entry: extra bit plus the property bytes, sized by
/// the sprite's byte counts.
#[derive(Debug, Clone, Default)]
pub struct Collection {
    pub name: String,
    pub extra_bit: bool,
    pub prop: Vec<u8>,
}

/// Everything known about one custom sprite. Populated by external parsing
/// code; the pointer fields default to the shared RTL sentinel.
#[derive(Debug, Clone)]
pub struct Sprite {
    pub number: u32,
    pub line: u32,
    pub level: u16,
    pub table: SpriteTable,
    pub ptrs: BehaviorPointers,
    pub extended_cape_ptr: PointerValue,
    pub byte_count: u8,
    pub extra_byte_count: u8,
    pub directory: String,
    pub asm_file: String,
    pub cfg_file: String,
    pub map_data: Vec<Map16>,
    pub disp_kind: DisplayKind,
    pub displays: Vec<DisplayEntry>,
    pub collections: Vec<Collection>,
    pub list_type: ListType,
}

impl Default for Sprite {
    fn default() -> Sprite {
        Sprite {
            number: 0,
            line: 0,
            level: NO_LEVEL,
            table: SpriteTable::default(),
            ptrs: BehaviorPointers::default(),
            extended_cape_ptr: PointerValue::default(),
            byte_count: 0,
            extra_byte_count: 0,
            directory: String::new(),
            asm_file: String::new(),
            cfg_file: String::new(),
            map_data: Vec::new(),
            disp_kind: DisplayKind::default(),
            displays: Vec::new(),
            collections: Vec::new(),
            list_type: ListType::default(),
        }
    }
}

impl Sprite {
    /// Reset every field to its zero/sentinel default.
    pub fn clear(&mut self) {
        *self = Sprite::default();
    }

    /// True while both entry pointers still hold the RTL sentinel, i.e. no
    /// code has been attached to this slot.
    pub fn has_empty_table(&self) -> bool {
        self.table.init.is_empty() && self.table.main.is_empty()
    }

    /// How many property bytes a collection entry of this sprite carries.
    pub fn collection_byte_count(&self, extra_bit: bool) -> usize {
        if extra_bit {
            self.extra_byte_count as usize
        } else {
            self.byte_count as usize
        }
    }
}

/// True when every sprite in the set still has the default table pointers.
pub fn all_empty(sprites: &[Sprite]) -> bool {
    sprites.iter().all(Sprite::has_empty_table)
}

impl Display for Sprite {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), Error> {
        writeln!(f, "Type:       {:02X}", self.table.sprite_type)?;
        writeln!(f, "ActLike:    {:02X}", self.table.actlike)?;
        writeln!(
            f,
            "Tweak:      {:02X}, {:02X}, {:02X}, {:02X}, {:02X}, {:02X}",
            self.table.tweak[0],
            self.table.tweak[1],
            self.table.tweak[2],
            self.table.tweak[3],
            self.table.tweak[4],
            self.table.tweak[5],
        )?;

        // Tweak-only sprites have no code of their own.
        if self.table.sprite_type != 0 {
            writeln!(
                f,
                "Extra:      {:02X}, {:02X}",
                self.table.extra[0], self.table.extra[1]
            )?;
            writeln!(f, "ASM File:   {}", self.asm_file)?;
            writeln!(
                f,
                "Byte Count: {}, {}",
                self.byte_count, self.extra_byte_count
            )?;
        }

        if !self.map_data.is_empty() {
            writeln!(f, "Map16:")?;
            for m in &self.map_data {
                writeln!(
                    f,
                    "\t{:02X}, {:02X}, {:02X}, {:02X}, {:02X}, {:02X}, {:02X}, {:02X}",
                    m.top_left.tile,
                    m.top_left.prop,
                    m.bottom_left.tile,
                    m.bottom_left.prop,
                    m.top_right.tile,
                    m.top_right.prop,
                    m.bottom_right.tile,
                    m.bottom_right.prop,
                )?;
            }
        }

        if !self.displays.is_empty() {
            writeln!(f, "Displays:")?;
            for d in &self.displays {
                writeln!(
                    f,
                    "\tX: {}, Y: {}, Extra-Bit: {}",
                    d.x_or_index, d.y_or_value, d.extra_bit
                )?;
                writeln!(f, "\tDescription: {}", d.description)?;
                for t in &d.tiles {
                    if t.text.is_empty() {
                        writeln!(f, "\t\t{},{},{:X}", t.x_offset, t.y_offset, t.tile_number)?;
                    } else {
                        writeln!(f, "\t\t{},{},*{}*", t.x_offset, t.y_offset, t.text)?;
                    }
                }
            }
        }

        if !self.collections.is_empty() {
            writeln!(f, "Collections:")?;
            for c in &self.collections {
                write!(f, "\tExtra-Bit: {}, Property Bytes: ( ", c.extra_bit)?;
                for byte in c.prop.iter().take(self.collection_byte_count(c.extra_bit)) {
                    write!(f, "{:02X} ", byte)?;
                }
                writeln!(f, ") Name: {}", c.name)?;
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::addressing::PointerValue;

    #[test]
    fn cleared_sprite_has_empty_table() {
        let mut sprite = Sprite::default();
        sprite.table.init = PointerValue::new(0x128000);
        sprite.level = 0x105;
        sprite.collections.push(Collection::default());
        sprite.clear();
        assert!(sprite.has_empty_table());
        assert_eq!(sprite.level, NO_LEVEL);
        assert!(sprite.collections.is_empty());
    }

    #[test]
    fn non_sentinel_pointer_is_not_empty() {
        let mut sprite = Sprite::default();
        sprite.table.init = PointerValue::new(0x128000);
        assert!(!sprite.has_empty_table());

        let mut sprite = Sprite::default();
        sprite.table.main = PointerValue::new(0x128000);
        assert!(!sprite.has_empty_table());
    }

    #[test]
    fn all_empty_is_the_per_sprite_predicate_anded() {
        let mut sprites = vec![Sprite::default(), Sprite::default()];
        assert!(all_empty(&sprites));
        sprites[1].table.main = PointerValue::new(0x128000);
        assert!(!all_empty(&sprites));
        assert!(all_empty(&[]));
    }

    #[test]
    fn display_includes_code_fields_only_for_custom_sprites() {
        let mut sprite = Sprite::default();
        sprite.asm_file = String::from("thwomp.asm");
        let text = format!("{}", sprite);
        assert!(text.contains("Type:       00"));
        assert!(!text.contains("ASM File"));

        sprite.table.sprite_type = 1;
        let text = format!("{}", sprite);
        assert!(text.contains("ASM File:   thwomp.asm"));
    }

    #[test]
    fn display_collection_respects_byte_counts() {
        let mut sprite = Sprite::default();
        sprite.table.sprite_type = 1;
        sprite.byte_count = 2;
        sprite.extra_byte_count = 4;
        sprite.collections.push(Collection {
            name: String::from("Red Thwomp"),
            extra_bit: false,
            prop: vec![0xAA, 0xBB, 0xCC, 0xDD],
        });
        let text = format!("{}", sprite);
        assert!(text.contains("( AA BB ) Name: Red Thwomp"));
    }
}
