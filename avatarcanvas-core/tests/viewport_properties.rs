use avatarcanvas_core::{Point, Rect, Size, ViewportModel, DEFAULT_SCALE_MAX};

const IMAGES: [(f64, f64); 5] = [
    (1000.0, 600.0),
    (1000.0, 400.0),
    (400.0, 1000.0),
    (512.0, 512.0),
    (3000.0, 2000.0),
];
const CANVASES: [(f64, f64); 3] = [(300.0, 300.0), (640.0, 480.0), (200.0, 500.0)];
const MODIFIERS: [f64; 6] = [1.0, 1.1, 1.5, 2.0, 3.75, 5.0];
const OFFSETS: [(f64, f64); 7] = [
    (0.0, 0.0),
    (5000.0, 0.0),
    (-5000.0, 0.0),
    (0.0, 5000.0),
    (0.0, -5000.0),
    (123.4, -56.7),
    (-1e6, 1e6),
];
const ORIGINS: [(f64, f64); 4] = [(0.0, 0.0), (0.5, 0.5), (1.0, 1.0), (-2.0, 3.0)];

fn size((w, h): (f64, f64)) -> Size {
    Size::new(w, h)
}

#[test]
fn view_rect_always_inside_image() {
    for &image in &IMAGES {
        for &canvas in &CANVASES {
            for &modifier in &MODIFIERS {
                for &offset in &OFFSETS {
                    let mut vp =
                        ViewportModel::cover(size(image), size(canvas), DEFAULT_SCALE_MAX);
                    vp.set_scale_modifier(modifier);
                    vp.set_offset(Point::from(offset));

                    let rect = vp.compute_view_rect(size(canvas));
                    let bounds = Rect::from_size(size(image));

                    assert!(
                        bounds.contains_rect(&rect, 1e-9),
                        "image {:?} canvas {:?} modifier {} offset {:?} -> {:?}",
                        image,
                        canvas,
                        modifier,
                        offset,
                        rect
                    );
                }
            }
        }
    }
}

#[test]
fn view_rect_inside_image_for_any_prior_origin() {
    for &image in &IMAGES {
        for &(fx, fy) in &ORIGINS {
            let canvas = size((300.0, 300.0));
            let mut vp = ViewportModel::cover(size(image), canvas, DEFAULT_SCALE_MAX);
            vp.set_scale_modifier(2.0);
            // Drive the origin anywhere by committing a drag
            let target = Point::new(image.0 * fx, image.1 * fy);
            vp.set_offset(vp.origin().sub(&target));
            vp.commit_offset();

            let rect = vp.compute_view_rect(canvas);

            assert!(Rect::from_size(size(image)).contains_rect(&rect, 1e-9));
        }
    }
}

#[test]
fn compute_is_idempotent_after_release() {
    for &image in &IMAGES {
        for &offset in &OFFSETS {
            let canvas = size((640.0, 480.0));
            let mut vp = ViewportModel::cover(size(image), canvas, DEFAULT_SCALE_MAX);
            vp.set_scale_modifier(1.5);
            vp.set_offset(Point::from(offset));
            vp.compute_view_rect(canvas);
            vp.commit_offset();

            let first = vp.compute_view_rect(canvas);
            let second = vp.compute_view_rect(canvas);

            assert_eq!(first, second, "image {:?} offset {:?}", image, offset);
        }
    }
}

#[test]
fn compute_is_stable_mid_drag() {
    for &offset in &OFFSETS {
        let canvas = size((300.0, 300.0));
        let mut vp = ViewportModel::cover(size((1000.0, 600.0)), canvas, DEFAULT_SCALE_MAX);
        vp.set_scale_modifier(2.0);
        vp.set_offset(Point::from(offset));

        let first = vp.compute_view_rect(canvas);
        let second = vp.compute_view_rect(canvas);

        assert!((first.x - second.x).abs() < 1e-9);
        assert!((first.y - second.y).abs() < 1e-9);
        assert_eq!(first.size(), second.size());
    }
}

#[test]
fn pan_release_round_trip() {
    let canvas = size((300.0, 300.0));
    let mut vp = ViewportModel::cover(size((1000.0, 600.0)), canvas, DEFAULT_SCALE_MAX);
    vp.set_scale_modifier(2.0);
    let start = vp.origin();
    let delta = Point::new(37.5, -22.25);

    vp.set_offset(delta);
    vp.compute_view_rect(canvas);
    vp.commit_offset();

    assert_eq!(vp.origin(), start.sub(&delta));
    assert_eq!(vp.offset(), Point::ORIGIN);
}

#[test]
fn coordinate_mapping_round_trip() {
    let view = Rect::new(123.25, 45.5, 320.0, 240.0);
    for &scale in &[0.3, 0.5, 1.0, 1.875, 4.0] {
        for &(x, y) in &[(0.0, 0.0), (150.0, 30.0), (299.9, 299.9), (17.3, 251.0)] {
            let canvas_point = Point::new(x, y);
            let image_point = ViewportModel::to_image_space(canvas_point, &view, scale);
            let back = ViewportModel::to_canvas_space(image_point, &view, scale);

            assert!((back.x - x).abs() < 1e-9 && (back.y - y).abs() < 1e-9);
        }
    }
}

#[test]
fn scenario_wide_image_square_canvas() {
    let canvas = size((300.0, 300.0));
    let mut vp = ViewportModel::cover(size((1000.0, 600.0)), canvas, DEFAULT_SCALE_MAX);

    assert_eq!(vp.base_scale(), 0.5);
    assert_eq!(vp.origin(), Point::new(500.0, 300.0));

    let rect = vp.compute_view_rect(canvas);
    assert_eq!(rect.width, 600.0);
    assert_eq!(rect.height, 600.0);
    // Height exactly matches the image: no vertical clamp
    assert_eq!(rect.y, 0.0);
    assert_eq!(vp.origin(), Point::new(500.0, 300.0));
}

#[test]
fn scenario_short_image_clamps_vertically() {
    let canvas = size((300.0, 300.0));
    let mut vp = ViewportModel::cover(size((1000.0, 400.0)), canvas, DEFAULT_SCALE_MAX);
    assert_eq!(vp.base_scale(), 0.75);

    // Push the view 200px past the bottom edge: y would be 200, bottom 600
    vp.set_offset(Point::new(0.0, -200.0));
    let rect = vp.compute_view_rect(canvas);

    assert_eq!(rect.height, 400.0);
    assert_eq!(rect.y, 0.0);
    assert_eq!(rect.bottom(), 400.0);
}
