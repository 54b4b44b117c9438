//! ToUnicode CMaps for embedded Unicode fonts.
//!
//! Unicode fonts are written with CIDs equal to the UTF-16 code units of the
//! text, so the ToUnicode map is the identity over the two-byte code space.

/// The Adobe-Identity-UCS CMap body.
pub const IDENTITY_UCS: &str = "/CIDInit /ProcSet findresource begin
12 dict begin
begincmap
/CIDSystemInfo
<</Registry (Adobe)
/Ordering (UCS)
/Supplement 0
>> def
/CMapName /Adobe-Identity-UCS def
/CMapType 2 def
1 begincodespacerange
<0000> <FFFF>
endcodespacerange
1 beginbfrange
<0000> <FFFF> <0000>
endbfrange
endcmap
CMapName currentdict /CMap defineresource pop
end
end";

/// Registry, ordering and supplement written in a CIDFont's CIDSystemInfo.
pub const CID_SYSTEM_INFO: (&str, &str, i64) = ("Adobe", "Identity", 0);
