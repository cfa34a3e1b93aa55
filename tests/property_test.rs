//! Invariants checked over pseudo-random layouts.

use std::collections::HashMap;

use exportgrid::{
    Border, BorderLine, Color, ComponentInfo, CoordinateAxis, ExportMatrix, MatrixOptions,
    PageInfo, Style,
};

/// Small deterministic generator so failures are reproducible.
struct Lcg(u64);

impl Lcg {
    fn next(&mut self) -> u64 {
        self.0 = self
            .0
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
        self.0 >> 33
    }

    fn range(&mut self, low: f32, high: f32) -> f32 {
        let unit = (self.next() % 10_000) as f32 / 10_000.0;
        low + unit * (high - low)
    }

    fn pick(&mut self, n: u64) -> u64 {
        self.next() % n
    }
}

fn random_components(rng: &mut Lcg, first: usize, count: usize) -> Vec<ComponentInfo> {
    let colors = [Color::BLACK, Color::rgb(200, 0, 0)];
    (first..first + count)
        .map(|i| {
            let left = rng.range(0.0, 150.0);
            let top = rng.range(0.0, 150.0);
            let width = rng.range(0.0, 60.0);
            let height = rng.range(0.0, 60.0);
            let line = BorderLine::solid(colors[rng.pick(2) as usize], 1.0);
            let style = match rng.pick(3) {
                0 => Style::new(),
                1 => Style::new().with_border(Border::all(line)),
                _ => Style::new().with_fill(Color::rgb(230, 230, 230)),
            };
            let component = match rng.pick(4) {
                0 => ComponentInfo::shape(left, top, width, height),
                1 => ComponentInfo::band(left, top, width, height),
                _ => ComponentInfo::text(left, top, width, height, format!("t{i}")),
            };
            component.with_style(style)
        })
        .collect()
}

fn build(seed: u64, tolerance: f32) -> ExportMatrix {
    let mut rng = Lcg(seed);
    let mut matrix = ExportMatrix::new(MatrixOptions::new().with_tolerance(tolerance));
    for page in 0..2 {
        let components = random_components(&mut rng, page * 25, 25);
        matrix
            .add_page(&PageInfo::new(220.0, 220.0), &components)
            .unwrap();
    }
    matrix
}

fn ownership(matrix: &ExportMatrix) -> HashMap<usize, Vec<(usize, usize)>> {
    let mut owners: HashMap<usize, Vec<(usize, usize)>> = HashMap::new();
    for y in 0..matrix.height() {
        for x in 0..matrix.width() {
            if let Some(id) = matrix.cell(x, y) {
                owners.entry(id).or_default().push((x, y));
            }
        }
    }
    owners
}

const SEEDS: [u64; 6] = [1, 7, 42, 1234, 98765, 20240601];

#[test]
fn test_axis_lookup_within_tolerance() {
    for seed in SEEDS {
        let mut rng = Lcg(seed);
        let tolerance = rng.range(0.1, 5.0);
        let values: Vec<f32> = (0..200).map(|_| rng.range(0.0, 1000.0)).collect();

        let mut axis = CoordinateAxis::new(tolerance);
        for &v in &values {
            axis.add(v);
        }
        axis.close();

        assert!(axis.nodes().windows(2).all(|w| w[0] < w[1]));
        for &v in &values {
            let index = axis.index_of(v).expect("inserted value has a node");
            let node = axis.position(index).unwrap();
            assert!((node - v).abs() <= tolerance + 1e-3, "seed {seed}: {v} -> {node}");
        }
    }
}

#[test]
fn test_axis_collapse_threshold() {
    for seed in SEEDS {
        let mut rng = Lcg(seed);
        let tolerance = rng.range(0.2, 4.0);
        let a = rng.range(50.0, 500.0);

        let mut near = CoordinateAxis::new(tolerance);
        near.add(a);
        near.add(a + tolerance * 0.5);
        near.close();
        assert_eq!(near.index_of(a), near.index_of(a + tolerance * 0.5));

        let mut far = CoordinateAxis::new(tolerance);
        far.add(a);
        far.add(a + tolerance * 1.5);
        far.close();
        assert_ne!(far.index_of(a), far.index_of(a + tolerance * 1.5));
    }
}

#[test]
fn test_painted_cells_inside_declared_rectangle() {
    for seed in SEEDS {
        let mut matrix = build(seed, 0.5);
        matrix.render();

        for (id, cells) in ownership(&matrix) {
            let rect = matrix.object_at(id).unwrap().grid;
            for (x, y) in cells {
                assert!(rect.contains(x, y), "seed {seed}: object {id} painted ({x}, {y})");
            }
        }
    }
}

#[test]
fn test_live_objects_are_exact_rectangles() {
    for seed in SEEDS {
        let mut matrix = build(seed, 0.5);
        matrix.prepare();

        let owners = ownership(&matrix);
        let live = matrix.live_objects();
        assert_eq!(owners.len(), live.len(), "seed {seed}");

        for (id, cells) in owners {
            let rect = matrix
                .object_grid_position(id)
                .unwrap_or_else(|| panic!("seed {seed}: object {id} owns cells but is not resolved"));
            assert_eq!(cells.len(), rect.area(), "seed {seed}: object {id}");
            assert!(cells.iter().all(|&(x, y)| rect.contains(x, y)));
        }
    }
}

#[test]
fn test_area_conservation() {
    for seed in SEEDS {
        let mut matrix = build(seed, 1.0);
        matrix.render();
        let painted: HashMap<usize, usize> = ownership(&matrix)
            .into_iter()
            .map(|(id, cells)| (id, cells.len()))
            .collect();
        let originals = matrix.object_count();

        matrix.analyze();
        let owners = ownership(&matrix);

        for (&id, &area) in &painted {
            let own = owners.get(&id).map_or(0, |cells| cells.len());
            let fragments: usize = (originals..matrix.object_count())
                .filter(|&f| matrix.object_at(f).and_then(|o| o.parent) == Some(id))
                .map(|f| owners.get(&f).map_or(0, |cells| cells.len()))
                .sum();
            assert_eq!(own + fragments, area, "seed {seed}: object {id}");
        }
    }
}

#[test]
fn test_text_never_duplicated() {
    for seed in SEEDS {
        let mut matrix = build(seed, 0.5);
        matrix.prepare();

        let mut seen = HashMap::new();
        for obj in matrix.objects() {
            if !obj.text().is_empty() {
                *seen.entry(obj.text().to_string()).or_insert(0) += 1;
            }
        }
        assert!(seen.values().all(|&count| count == 1), "seed {seed}");
    }
}

#[test]
fn test_optimize_borders_idempotent() {
    for seed in SEEDS {
        let mut matrix = build(seed, 0.5);
        matrix.optimize_borders();
        let first: Vec<usize> = matrix.objects().iter().map(|o| o.style).collect();

        assert_eq!(matrix.optimize_borders(), 0, "seed {seed}");
        let second: Vec<usize> = matrix.objects().iter().map(|o| o.style).collect();
        assert_eq!(first, second, "seed {seed}");
    }
}

#[test]
fn test_roles_preserved_by_fragments() {
    for seed in SEEDS {
        let mut matrix = build(seed, 0.5);
        matrix.prepare();

        for obj in matrix.objects().iter().filter(|o| o.is_fragment()) {
            let parent = obj.parent.and_then(|p| matrix.object_at(p)).unwrap();
            assert_eq!(obj.role, parent.role);
            assert!(!parent.resolved);
        }
    }
}
