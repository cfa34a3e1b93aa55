//! Role-specific translation of producer components into placed objects.

use super::builder::ExportMatrix;
use crate::model::{
    BorderLine, Color, ComponentInfo, Content, GridObject, ObjectRole, PictureDigest, Side,
};

/// Border width assumed for lines that declare none.
const DEFAULT_LINE_WIDTH: f32 = 1.0;

impl ExportMatrix {
    /// Translate one component into a placed object and register its edges.
    pub(super) fn place(
        &mut self,
        page_offset: f32,
        component: &ComponentInfo,
        digest: Option<PictureDigest>,
    ) -> usize {
        let zoom = self.options.zoom;
        let left = component.left * zoom;
        let top = component.top * zoom + page_offset;
        let mut width = component.width * zoom;
        let mut height = component.height * zoom;

        let mut role = component.role;
        let mut style = component.style.clone();

        match role {
            ObjectRole::Text => {
                if component.rotation != 0 {
                    style.angle = component.rotation;
                }
                if self.options.rotated_as_image && style.angle != 0 {
                    role = ObjectRole::Picture;
                }
            }
            ObjectRole::Line => {
                let line_width = style.border.widest().unwrap_or(DEFAULT_LINE_WIDTH);
                let horizontal = width >= height;
                if horizontal && height == 0.0 {
                    height = line_width * zoom;
                } else if !horizontal && width == 0.0 {
                    width = line_width * zoom;
                }
                if style.border.is_empty() {
                    let side = if horizontal { Side::Top } else { Side::Left };
                    style
                        .border
                        .set_side(side, Some(BorderLine::solid(Color::BLACK, line_width)));
                }
                style = style.without_text_attributes();
            }
            ObjectRole::Shape | ObjectRole::Band => {
                style = style.without_text_attributes();
            }
            ObjectRole::Picture => {}
        }

        let picture = match (&component.picture, role) {
            (Some(data), ObjectRole::Picture) => Some(match digest {
                Some(digest) => self.pictures.insert_with_digest(data.clone(), digest),
                None => self.pictures.insert(data.clone()),
            }),
            _ => None,
        };
        let content = Content {
            text: component.text.clone().unwrap_or_default(),
            hyperlink: component.hyperlink.clone(),
            picture,
        };

        let style = self.styles.intern(style);
        self.x_axis.add(left);
        self.x_axis.add(left + width);
        self.y_axis.add(top);
        self.y_axis.add(top + height);

        self.objects
            .push(GridObject::new(left, top, width, height, role, style, content));
        self.objects.len() - 1
    }
}

#[cfg(test)]
mod tests {
    use crate::matrix::{ExportMatrix, MatrixOptions};
    use crate::model::{
        BorderLine, Color, ComponentInfo, Font, ObjectRole, PageInfo, Side, Style,
    };

    fn place_one(options: MatrixOptions, component: ComponentInfo) -> ExportMatrix {
        let mut matrix = ExportMatrix::new(options);
        matrix.add_page(&PageInfo::a4(), &[component]).unwrap();
        matrix
    }

    #[test]
    fn test_horizontal_line_gets_thickness_and_border() {
        let matrix = place_one(MatrixOptions::new(), ComponentInfo::line(10.0, 50.0, 200.0, 0.0));
        let obj = matrix.object_at(0).unwrap();
        let style = matrix.object_style(0).unwrap();

        assert_eq!(obj.height, 1.0);
        assert_eq!(obj.width, 200.0);
        assert_eq!(style.border.side(Side::Top), Some(BorderLine::solid(Color::BLACK, 1.0)));
        assert_eq!(style.border.side(Side::Left), None);
    }

    #[test]
    fn test_vertical_line_uses_declared_width() {
        let mut declared = Style::new();
        declared
            .border
            .set_side(Side::Right, Some(BorderLine::solid(Color::rgb(255, 0, 0), 3.0)));
        let line = ComponentInfo::line(10.0, 0.0, 0.0, 100.0).with_style(declared);
        let matrix = place_one(MatrixOptions::new().with_zoom(2.0), line);

        let obj = matrix.object_at(0).unwrap();
        let style = matrix.object_style(0).unwrap();
        assert_eq!(obj.width, 6.0);
        assert_eq!(style.border.side(Side::Left), None);
        assert_eq!(style.border.widest(), Some(3.0));
    }

    #[test]
    fn test_shape_loses_text_attributes() {
        let style = Style::new()
            .with_fill(Color::WHITE)
            .with_font(Font {
                bold: true,
                ..Font::default()
            });
        let matrix = place_one(
            MatrixOptions::new(),
            ComponentInfo::shape(0.0, 0.0, 10.0, 10.0).with_style(style),
        );
        let style = matrix.object_style(0).unwrap();

        assert_eq!(style.fill, Color::WHITE);
        assert_eq!(style.font, Font::default());
    }

    #[test]
    fn test_rotation_goes_into_style() {
        let text = ComponentInfo::text(0.0, 0.0, 20.0, 100.0, "Side").with_rotation(90);
        let matrix = place_one(MatrixOptions::new(), text);

        assert_eq!(matrix.object_style(0).map(|s| s.angle), Some(90));
        assert_eq!(matrix.object_at(0).map(|o| o.role), Some(ObjectRole::Text));
    }

    #[test]
    fn test_rotated_text_as_picture() {
        let text = ComponentInfo::text(0.0, 0.0, 20.0, 100.0, "Side")
            .with_rotation(270)
            .with_picture(b"\x89PNG\r\n\x1a\nrest".to_vec());
        let matrix = place_one(MatrixOptions::new().with_rotated_as_image(true), text);
        let obj = matrix.object_at(0).unwrap();

        assert_eq!(obj.role, ObjectRole::Picture);
        assert_eq!(obj.text(), "Side");
        assert_eq!(obj.content.picture, Some(0));
        assert_eq!(matrix.picture_count(), 1);
    }

    #[test]
    fn test_picture_bytes_ignored_for_text() {
        let text = ComponentInfo::text(0.0, 0.0, 20.0, 10.0, "Plain").with_picture(vec![1, 2, 3, 4]);
        let matrix = place_one(MatrixOptions::new(), text);

        assert_eq!(matrix.object_at(0).and_then(|o| o.content.picture), None);
        assert_eq!(matrix.picture_count(), 0);
    }

    #[test]
    fn test_structurally_equal_styles_shared() {
        let mut matrix = ExportMatrix::default();
        let fill = Style::new().with_fill(Color::rgb(200, 200, 200));
        matrix
            .add_page(
                &PageInfo::a4(),
                &[
                    ComponentInfo::shape(0.0, 0.0, 10.0, 10.0).with_style(fill.clone()),
                    ComponentInfo::band(0.0, 20.0, 10.0, 10.0).with_style(fill),
                ],
            )
            .unwrap();

        assert_eq!(matrix.style_count(), 1);
        assert_eq!(
            matrix.object_at(0).map(|o| o.style),
            matrix.object_at(1).map(|o| o.style)
        );
    }
}
