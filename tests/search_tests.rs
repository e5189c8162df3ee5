use corvid::eval::{is_mate_score, MaterialEvaluator};
use corvid::position::Position;
use corvid::search::parallel::{search_parallel, search_pvs, search_ybwc};
use corvid::search::perft::perft;
use corvid::search::sequential::search_sequential;

#[test]
fn mate_in_one_white_to_move() {
    let pos = Position::from_fen("6k1/5ppp/8/8/8/8/5PPP/R5K1 w - - 0 1").unwrap();
    let (pv, score) = search_sequential(&pos, &MaterialEvaluator, 2).unwrap();
    assert!(is_mate_score(score) && score > 0);
    assert_eq!(pv[0].to_uci(), "a1a8");
}

#[test]
fn stalemate_has_empty_pv_and_zero_score() {
    let pos = Position::from_fen("7k/5Q2/6K1/8/8/8/8/8 b - - 0 1").unwrap();
    let (pv, score) = search_sequential(&pos, &MaterialEvaluator, 3).unwrap();
    assert!(pv.is_empty());
    assert_eq!(score, 0);
}

#[test]
fn all_four_search_variants_agree_on_score() {
    let positions = [
        Position::starting(),
        Position::from_fen(
            "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1",
        )
        .unwrap(),
        Position::from_fen("8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8 w - - 0 1").unwrap(),
    ];
    for pos in positions {
        let (_, sequential_score) = search_sequential(&pos, &MaterialEvaluator, 4).unwrap();
        let (_, ybwc_score) = search_ybwc(&pos, &MaterialEvaluator, 4).unwrap();
        let (_, pvs_score) = search_pvs(&pos, &MaterialEvaluator, 4).unwrap();
        let (_, naive_score) = search_parallel(&pos, &MaterialEvaluator, 4).unwrap();
        assert_eq!(sequential_score, ybwc_score);
        assert_eq!(sequential_score, pvs_score);
        assert_eq!(sequential_score, naive_score);
    }
}

#[test]
fn perft_and_search_reject_zero_depth() {
    let pos = Position::starting();
    assert!(perft(&pos, 0).is_err());
    assert!(search_sequential(&pos, &MaterialEvaluator, 0).is_err());
    assert!(search_ybwc(&pos, &MaterialEvaluator, 0).is_err());
}
