//! Default CSS allow-lists and property discarders.

use std::collections::HashSet;

lazy_static::lazy_static! {
    /// Properties that cannot take an element out of its box. `position`,
    /// the inset properties and `z-index` are left out so sanitized content
    /// can not overlay the rest of the page.
    pub static ref DEFAULT_PROPERTY_ALLOWLIST: HashSet<String> = [
        "accent-color",
        "align-content",
        "align-items",
        "align-self",
        "alignment-baseline",
        "animation",
        "animation-delay",
        "animation-direction",
        "animation-duration",
        "animation-fill-mode",
        "animation-iteration-count",
        "animation-name",
        "animation-play-state",
        "animation-timing-function",
        "aspect-ratio",
        "backface-visibility",
        "background",
        "background-attachment",
        "background-blend-mode",
        "background-clip",
        "background-color",
        "background-image",
        "background-origin",
        "background-position",
        "background-position-x",
        "background-position-y",
        "background-repeat",
        "background-size",
        "block-size",
        "border",
        "border-block",
        "border-block-end",
        "border-block-start",
        "border-bottom",
        "border-bottom-color",
        "border-bottom-left-radius",
        "border-bottom-right-radius",
        "border-bottom-style",
        "border-bottom-width",
        "border-collapse",
        "border-color",
        "border-inline",
        "border-inline-end",
        "border-inline-start",
        "border-left",
        "border-left-color",
        "border-left-style",
        "border-left-width",
        "border-radius",
        "border-right",
        "border-right-color",
        "border-right-style",
        "border-right-width",
        "border-spacing",
        "border-style",
        "border-top",
        "border-top-color",
        "border-top-left-radius",
        "border-top-right-radius",
        "border-top-style",
        "border-top-width",
        "border-width",
        "box-shadow",
        "box-sizing",
        "break-after",
        "break-before",
        "break-inside",
        "caption-side",
        "caret-color",
        "clear",
        "color",
        "color-scheme",
        "column-count",
        "column-fill",
        "column-gap",
        "column-rule",
        "column-rule-color",
        "column-rule-style",
        "column-rule-width",
        "column-span",
        "column-width",
        "columns",
        "cursor",
        "direction",
        "display",
        "empty-cells",
        "filter",
        "flex",
        "flex-basis",
        "flex-direction",
        "flex-flow",
        "flex-grow",
        "flex-shrink",
        "flex-wrap",
        "float",
        "font",
        "font-family",
        "font-feature-settings",
        "font-kerning",
        "font-size",
        "font-size-adjust",
        "font-stretch",
        "font-style",
        "font-synthesis",
        "font-variant",
        "font-variant-caps",
        "font-variant-east-asian",
        "font-variant-ligatures",
        "font-variant-numeric",
        "font-variant-position",
        "font-weight",
        "gap",
        "grid",
        "grid-area",
        "grid-auto-columns",
        "grid-auto-flow",
        "grid-auto-rows",
        "grid-column",
        "grid-column-end",
        "grid-column-start",
        "grid-row",
        "grid-row-end",
        "grid-row-start",
        "grid-template",
        "grid-template-areas",
        "grid-template-columns",
        "grid-template-rows",
        "height",
        "hyphens",
        "inline-size",
        "isolation",
        "justify-content",
        "justify-items",
        "justify-self",
        "letter-spacing",
        "line-break",
        "line-height",
        "list-style",
        "list-style-image",
        "list-style-position",
        "list-style-type",
        "margin",
        "margin-block",
        "margin-block-end",
        "margin-block-start",
        "margin-bottom",
        "margin-inline",
        "margin-inline-end",
        "margin-inline-start",
        "margin-left",
        "margin-right",
        "margin-top",
        "max-block-size",
        "max-height",
        "max-inline-size",
        "max-width",
        "min-block-size",
        "min-height",
        "min-inline-size",
        "min-width",
        "mix-blend-mode",
        "object-fit",
        "object-position",
        "opacity",
        "order",
        "outline",
        "outline-color",
        "outline-offset",
        "outline-style",
        "outline-width",
        "overflow",
        "overflow-wrap",
        "overflow-x",
        "overflow-y",
        "padding",
        "padding-block",
        "padding-block-end",
        "padding-block-start",
        "padding-bottom",
        "padding-inline",
        "padding-inline-end",
        "padding-inline-start",
        "padding-left",
        "padding-right",
        "padding-top",
        "page-break-after",
        "page-break-before",
        "page-break-inside",
        "perspective",
        "perspective-origin",
        "place-content",
        "place-items",
        "place-self",
        "quotes",
        "resize",
        "rotate",
        "row-gap",
        "scale",
        "tab-size",
        "table-layout",
        "text-align",
        "text-align-last",
        "text-decoration",
        "text-decoration-color",
        "text-decoration-line",
        "text-decoration-skip-ink",
        "text-decoration-style",
        "text-decoration-thickness",
        "text-emphasis",
        "text-indent",
        "text-justify",
        "text-orientation",
        "text-overflow",
        "text-shadow",
        "text-transform",
        "text-underline-offset",
        "text-underline-position",
        "transform",
        "transform-box",
        "transform-origin",
        "transform-style",
        "transition",
        "transition-delay",
        "transition-duration",
        "transition-property",
        "transition-timing-function",
        "translate",
        "unicode-bidi",
        "vertical-align",
        "visibility",
        "white-space",
        "width",
        "word-break",
        "word-spacing",
        "word-wrap",
        "writing-mode",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect();

    /// Lower-case function names allowed in property values.
    pub static ref DEFAULT_FUNCTION_ALLOWLIST: HashSet<String> = [
        "blur",
        "brightness",
        "calc",
        "clamp",
        "conic-gradient",
        "contrast",
        "cubic-bezier",
        "drop-shadow",
        "fit-content",
        "grayscale",
        "hsl",
        "hsla",
        "hue-rotate",
        "hwb",
        "invert",
        "lab",
        "lch",
        "linear-gradient",
        "matrix",
        "matrix3d",
        "max",
        "min",
        "minmax",
        "oklab",
        "oklch",
        "perspective",
        "radial-gradient",
        "repeat",
        "repeating-conic-gradient",
        "repeating-linear-gradient",
        "repeating-radial-gradient",
        "rgb",
        "rgba",
        "rotate",
        "rotate3d",
        "rotatex",
        "rotatey",
        "rotatez",
        "saturate",
        "scale",
        "scale3d",
        "scalex",
        "scaley",
        "scalez",
        "sepia",
        "skew",
        "skewx",
        "skewy",
        "steps",
        "translate",
        "translate3d",
        "translatex",
        "translatey",
        "translatez",
        "url",
        "var",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect();
}

/// Vetoes `animation` and every `animation-*` longhand.
pub fn discard_animations(property: &str) -> bool {
    property == "animation" || property.starts_with("animation-")
}

/// Vetoes `transition` and every `transition-*` longhand.
pub fn discard_transitions(property: &str) -> bool {
    property == "transition" || property.starts_with("transition-")
}
