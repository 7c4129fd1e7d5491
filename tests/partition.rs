extern crate mandeltile;
extern crate rand;

use mandeltile::tiles::partition;
use mandeltile::{FrameSize, Grid, Tile};
use rand::Rng;

fn ownership(size: FrameSize, tiles: &[Tile]) -> Vec<usize> {
    let mut owners = vec![0; size.len()];
    for tile in tiles {
        for pixel in tile.bounds.pixels() {
            owners[size.offset(pixel)] += 1;
        }
    }
    owners
}

#[test]
fn random_frames_are_owned_exactly_once() {
    let mut rng = rand::thread_rng();
    for _ in 0..200 {
        let size = FrameSize::new(rng.gen_range(1, 160), rng.gen_range(1, 120));
        let grid = Grid {
            rows: rng.gen_range(1, 12),
            cols: rng.gen_range(1, 12),
        };
        let tiles = partition(size, grid);
        assert_eq!(tiles.len(), grid.cells());
        let owners = ownership(size, &tiles);
        assert!(
            owners.iter().all(|&n| n == 1),
            "{} frame with {:?} is not partitioned exactly",
            size,
            grid
        );
    }
}

#[test]
fn tiles_stay_inside_the_frame() {
    let size = FrameSize::new(97, 31);
    for tile in partition(size, Grid { rows: 6, cols: 9 }) {
        assert!(tile.bounds.bottom <= size.height);
        assert!(tile.bounds.right <= size.width);
        assert!(tile.bounds.top <= tile.bounds.bottom);
        assert!(tile.bounds.left <= tile.bounds.right);
    }
}

#[test]
fn owners_are_positions() {
    let tiles = partition(FrameSize::new(50, 50), Grid { rows: 3, cols: 3 });
    for (i, tile) in tiles.iter().enumerate() {
        assert_eq!(tile.owner, i);
    }
}
