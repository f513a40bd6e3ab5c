fn main() {
    pollster::block_on(pinsphere::run());
}
