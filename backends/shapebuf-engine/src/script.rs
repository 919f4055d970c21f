//! Script lookup for segment property guessing

use icu_properties::props::Script as IcuScript;
use icu_properties::{
    CodePointMapData, CodePointMapDataBorrowed, PropertyNamesShort, PropertyNamesShortBorrowed,
};
use shapebuf_core::types::{Script, Tag};

/// Maps codepoints to their Unicode Script property
pub struct ScriptLookup {
    map: CodePointMapDataBorrowed<'static, IcuScript>,
    names: PropertyNamesShortBorrowed<'static, IcuScript>,
}

impl ScriptLookup {
    pub fn new() -> Self {
        Self {
            map: CodePointMapData::<IcuScript>::new(),
            names: PropertyNamesShort::<IcuScript>::new(),
        }
    }

    /// Script of one codepoint; non-scalar values are Unknown
    pub fn script_of(&self, codepoint: u32) -> Script {
        match char::from_u32(codepoint) {
            Some(ch) => self.iso15924(self.map.get(ch)),
            None => Script::UNKNOWN,
        }
    }

    /// ICU's short property name is the ISO 15924 code
    fn iso15924(&self, script: IcuScript) -> Script {
        self.names
            .get(script)
            .and_then(|name| <&[u8; 4]>::try_from(name.as_bytes()).ok())
            .map_or(Script::UNKNOWN, |tag| Script::from_iso15924_tag(Tag::new(tag)))
    }

    /// First script in `codepoints` that says something about the run
    pub fn first_significant(&self, codepoints: impl IntoIterator<Item = u32>) -> Option<Script> {
        codepoints
            .into_iter()
            .map(|cp| self.script_of(cp))
            .find(|script| script.is_significant())
    }
}

impl Default for ScriptLookup {
    fn default() -> Self {
        Self::new()
    }
}
