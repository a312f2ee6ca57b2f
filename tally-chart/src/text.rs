use skia::textlayout::{FontCollection, Paragraph, ParagraphBuilder, ParagraphStyle, TextAlign, TextStyle};
use skia_safe as skia;

const FAMILIES: &[&str] = &["DejaVu Sans", "Liberation Sans", "Arial", "Helvetica", "sans-serif"];

/// Lays out and paints single-line labels with the system font manager.
/// Hosts without any fonts still paint, just without glyphs.
pub(crate) struct TextShaper {
    fonts: FontCollection,
}

impl TextShaper {
    pub fn new() -> Self {
        let mut fonts = FontCollection::new();
        fonts.set_default_font_manager(skia::FontMgr::default(), None);
        Self { fonts }
    }

    fn layout(&self, text: &str, size: f32, color: skia::Color) -> Paragraph {
        let mut style = TextStyle::new();
        style.set_font_size(size.max(1.0));
        style.set_color(color);
        style.set_font_families(FAMILIES);

        let mut pstyle = ParagraphStyle::new();
        pstyle.set_text_align(TextAlign::Left);
        let mut builder = ParagraphBuilder::new(&pstyle, &self.fonts);
        builder.push_style(&style);
        builder.add_text(text);
        let mut paragraph = builder.build();
        paragraph.layout(10_000.0);
        paragraph
    }

    /// Paint `text` horizontally centred on `cx`, top edge at `y`.
    pub fn draw_centered(&self, canvas: &skia::Canvas, text: &str, cx: f32, y: f32, size: f32, color: skia::Color) {
        let paragraph = self.layout(text, size, color);
        paragraph.paint(canvas, (cx - paragraph.longest_line() / 2.0, y));
    }

    /// Paint `text` right-aligned to `right`, vertically centred on `cy`.
    pub fn draw_right(&self, canvas: &skia::Canvas, text: &str, right: f32, cy: f32, size: f32, color: skia::Color) {
        let paragraph = self.layout(text, size, color);
        paragraph.paint(canvas, (right - paragraph.longest_line(), cy - paragraph.height() / 2.0));
    }

    /// Paint `text` rotated a quarter turn counter-clockwise, centred on (cx, cy).
    pub fn draw_vertical(&self, canvas: &skia::Canvas, text: &str, cx: f32, cy: f32, size: f32, color: skia::Color) {
        let paragraph = self.layout(text, size, color);
        canvas.save();
        canvas.rotate(-90.0, Some(skia::Point::new(cx, cy)));
        paragraph.paint(
            canvas,
            (cx - paragraph.longest_line() / 2.0, cy - paragraph.height() / 2.0),
        );
        canvas.restore();
    }
}
