//! Tests the move generator (chess module)
//
//  This Source Code Form is subject to the terms of the Mozilla Public
//  License, v. 2.0. If a copy of the MPL was not distributed with this
//  file, You can obtain one at http://mozilla.org/MPL/2.0/.
//
////////////////////////////////////////////////////////////////////////////////////////////////////

mod move_gen {
    use shuai::chess::variations;

    mod starting_position {
        use super::count;

        const START: &str = "rnbakabnr/9/1c5c1/p1p1p1p1p/9/9/P1P1P1P1P/1C5C1/9/RNBAKABNR w - - 0 1";

        #[test]
        fn depth_1() { assert_eq!(count(START, 1), 44); }

        #[test]
        fn depth_2() { assert_eq!(count(START, 2), 1920); }

        #[test]
        fn depth_3() { assert_eq!(count(START, 3), 79666); }

        #[test]
        fn depth_4() { assert_eq!(count(START, 4), 3290240); }

        #[test]
        #[ignore]
        fn depth_5() { assert_eq!(count(START, 5), 133312995); }
    }

    #[test]
    fn facing_kings() {
        // the red king must step off the open file, after which the black king may not
        // step onto the red king's new file
        assert_eq!(count("4k4/9/9/9/9/9/9/9/9/4K4 w - - 0 1", 1), 2);
        assert_eq!(count("4k4/9/9/9/9/9/9/9/9/4K4 w - - 0 1", 2), 4);
    }

    #[test]
    fn rook_pinned_by_the_flying_general() {
        assert_eq!(count("4k4/9/9/9/9/9/4R4/9/9/4K4 w - - 0 1", 1), 11);
    }

    fn count(fen: &str, depth: usize) -> usize {
        println!("\n{}", fen);
        let mut pos = fen.parse().unwrap();

        let count = variations::print(&mut pos, depth);
        println!("Depth {} total:\t{:12}", depth, count);

        count
    }
}
